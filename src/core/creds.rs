use crate::core::repo::Dolt;
use crate::domain::model::KeyPair;
use crate::utils::error::{DoltError, Result};

impl Dolt {
    /// Create a new key pair for this repository.
    pub async fn creds_new(&self) -> Result<bool> {
        let output = self
            .run(vec!["creds".to_string(), "new".to_string()])
            .await?;

        let lines: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.len() == 2 {
            for line in &lines {
                tracing::info!("{}", line);
            }
            Ok(true)
        } else {
            Err(DoltError::parse(
                "creds new",
                format!("unexpected output:\n{}", output),
            ))
        }
    }

    /// Remove the key pair identified by the given public key.
    pub async fn creds_rm(&self, public_key: &str) -> Result<bool> {
        let output = self
            .run(vec![
                "creds".to_string(),
                "rm".to_string(),
                public_key.to_string(),
            ])
            .await?;

        if output.lines().next().is_some_and(|l| l.starts_with("failed")) {
            tracing::error!("{}", output);
            return Err(DoltError::Creds {
                message: "tried to remove non-existent creds".to_string(),
            });
        }
        Ok(true)
    }

    /// The key pairs known to this repository; the active one is marked
    /// with `*` in the listing.
    pub async fn creds_ls(&self) -> Result<Vec<KeyPair>> {
        let output = self
            .run(vec![
                "creds".to_string(),
                "ls".to_string(),
                "--verbose".to_string(),
            ])
            .await?;
        parse_creds(&output)
    }

    /// Check that credentials authenticate against the endpoint; false when
    /// the CLI reports an error.
    pub async fn creds_check(&self, endpoint: Option<&str>, creds: Option<&str>) -> Result<bool> {
        let mut args = vec!["creds".to_string(), "check".to_string()];
        if let Some(endpoint) = endpoint {
            args.push("--endpoint".to_string());
            args.push(endpoint.to_string());
        }
        if let Some(creds) = creds {
            args.push("--creds".to_string());
            args.push(creds.to_string());
        }

        let output = self.run(args).await?;
        for line in output.lines() {
            if line.starts_with("error") {
                tracing::error!("{}", line);
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Switch to the credentials identified by the public key ID.
    pub async fn creds_use(&self, public_key_id: &str) -> Result<bool> {
        let output = self
            .run(vec![
                "creds".to_string(),
                "use".to_string(),
                public_key_id.to_string(),
            ])
            .await?;

        if output.lines().next().is_some_and(|l| l.starts_with("error")) {
            tracing::error!("{}", output);
            return Err(DoltError::Creds {
                message: "bad public key".to_string(),
            });
        }
        Ok(true)
    }

    /// Importing credentials from a JWK file is not supported by this
    /// binding.
    pub async fn creds_import(&self, _jwk_filename: &str, _no_profile: bool) -> Result<()> {
        Err(DoltError::args("creds import is not supported"))
    }
}

fn parse_creds(output: &str) -> Result<Vec<KeyPair>> {
    let mut creds = Vec::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let (active, rest) = match line.strip_prefix('*') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let mut parts = rest.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some(public_key), Some(key_id)) => creds.push(KeyPair {
                public_key: public_key.to_string(),
                key_id: key_id.to_string(),
                active,
            }),
            _ => {
                return Err(DoltError::parse(
                    "creds ls",
                    format!("unexpected line: {}", line),
                ))
            }
        }
    }
    Ok(creds)
}
