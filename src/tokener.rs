use crate::error::Error;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub trait Payload: Serialize + for<'d> Deserialize<'d> {
    fn user(&self) -> &str;
}

pub trait Tokener<P: Payload> {
    fn gen_token(&self, payload: &P) -> Result<String, Error>;
    fn verify_token(&self, token: &str) -> Result<P, Error>;
}

pub struct Jwt {
    secret: Vec<u8>,
}

impl Jwt {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<P> Tokener<P> for Jwt
where
    P: Payload,
{
    fn gen_token(&self, payload: &P) -> Result<String, Error> {
        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(&self.secret);
        let token = encode(&header, payload, &key)?;
        Ok(token)
    }

    fn verify_token(&self, token: &str) -> Result<P, Error> {
        let key = DecodingKey::from_secret(&self.secret);
        let validation = Validation::new(Algorithm::HS256);
        let payload = decode(token, &key, &validation)?;
        Ok(payload.claims)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::ops::Add;

    #[derive(Debug, Deserialize, Serialize)]
    struct Claim {
        user: String,
        exp: i64,
    }

    impl Payload for Claim {
        fn user(&self) -> &str {
            &self.user
        }
    }

    fn claim_for(user: &str) -> Claim {
        Claim {
            user: user.into(),
            exp: chrono::offset::Utc::now().add(chrono::Duration::hours(1)).timestamp(),
        }
    }

    #[test]
    fn test_gen_and_verify_token() {
        let jwt = Jwt::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0]);
        let claim = claim_for("alice");
        let token = jwt.gen_token(&claim).unwrap();
        let c: Claim = jwt.verify_token(&token).unwrap();
        assert_eq!(claim.user, c.user);
    }

    #[test]
    fn test_different_tokens() {
        let jwt = Jwt::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0]);
        let token_a = jwt.gen_token(&claim_for("a")).unwrap();
        let token_b = jwt.gen_token(&claim_for("b")).unwrap();
        let c_a: Claim = jwt.verify_token(&token_a).unwrap();
        let c_b: Claim = jwt.verify_token(&token_b).unwrap();
        assert_eq!(c_a.user, "a");
        assert_eq!(c_b.user, "b");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let jwt = Jwt::new(b"first secret".to_vec());
        let other = Jwt::new(b"second secret".to_vec());
        let token = jwt.gen_token(&claim_for("alice")).unwrap();
        assert!(<Jwt as Tokener<Claim>>::verify_token(&other, &token).is_err());
    }
}
