pub mod choice;
pub mod comment;
pub mod question;
pub mod response;
pub mod survey;
pub mod taker;
pub mod user;
