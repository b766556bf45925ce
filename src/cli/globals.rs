use secrecy::SecretString;

#[derive(Clone)]
pub struct GlobalArgs {
    pub frontend_url: String,
    pub production: bool,
    pub jwt_secret: Option<SecretString>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(frontend_url: String, production: bool) -> Self {
        Self {
            frontend_url,
            production,
            jwt_secret: None,
        }
    }

    pub fn set_jwt_secret(&mut self, secret: SecretString) {
        self.jwt_secret = Some(secret);
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("frontend_url", &self.frontend_url)
            .field("production", &self.production)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new("http://localhost:3000".to_string(), false);
        assert_eq!(args.frontend_url, "http://localhost:3000");
        assert!(!args.production);
        assert!(args.jwt_secret.is_none());
    }

    #[test]
    fn test_set_jwt_secret() {
        let mut args = GlobalArgs::new("http://localhost:3000".to_string(), true);
        args.set_jwt_secret(SecretString::from("super-secret".to_string()));
        assert_eq!(
            args.jwt_secret.as_ref().map(ExposeSecret::expose_secret),
            Some("super-secret")
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let mut args = GlobalArgs::new("http://localhost:3000".to_string(), false);
        args.set_jwt_secret(SecretString::from("super-secret".to_string()));
        let debug = format!("{args:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("***"));
    }
}
