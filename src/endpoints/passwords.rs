//! Password resets.
//!
//! When no password is supplied one is generated: a word from the configured
//! random-word service followed by the configured complexity suffix.

use super::paths;
use crate::client::ConsoleClient;
use crate::error::{ConsoleError, ConsoleResult};
use crate::model::{Account, Outcome, PasswordReset};
use crate::transport::{ContentType, HttpRequest, Transport};
use log::{debug, info};
use serde_json::{Value, json};

impl<T: Transport> ConsoleClient<T> {
    /// Reset the password of the account with the given username.
    ///
    /// An unknown username is not an error: the result is
    /// [`Outcome::NoSelection`] and nothing is sent.
    pub async fn reset_password(
        &self,
        school: impl AsRef<str>,
        identity: &str,
        password: Option<&str>,
    ) -> ConsoleResult<Outcome<PasswordReset>> {
        let (school, _) = self.school_scope(school.as_ref())?;

        match self.lookup_account(&school, identity, false).await? {
            Some(account) => Ok(Outcome::Completed(
                self.reset_account_password(&school, &account, password)
                    .await?,
            )),
            None => {
                info!("No account '{}' in school {}; nothing reset", identity, school);
                Ok(Outcome::NoSelection)
            }
        }
    }

    /// Reset the password of an already resolved account.
    pub async fn reset_account_password(
        &self,
        school: impl AsRef<str>,
        account: &Account,
        password: Option<&str>,
    ) -> ConsoleResult<PasswordReset> {
        let (school, _) = self.school_scope(school.as_ref())?;
        let action = format!("Reset password for {}", account.username);

        let new_password = match password {
            Some(password) => password.to_string(),
            None => self
                .generate_password()
                .await
                .map_err(|e| ConsoleError::operation(&action, e))?,
        };

        let request = HttpRequest::post(paths::student_password(&school)).json(json!({
            "distinguishedName": account.distinguished_name,
            "password": new_password,
        }));
        self.mutate(&action, request).await?;

        info!("Password reset for {} in school {}", account.username, school);
        Ok(PasswordReset {
            name: account.display_name(),
            username: account.username.clone(),
            new_password,
        })
    }

    /// A random word plus the configured suffix.
    pub async fn generate_password(&self) -> ConsoleResult<String> {
        let request = HttpRequest::get(self.config().word_generator_url.as_str());
        let body = self.fetch_text(request, ContentType::Text).await?;
        let word = extract_word(&body).ok_or_else(|| ConsoleError::PasswordGeneration {
            message: "word service returned no word".to_string(),
        })?;
        debug!("Generated password from a {}-letter word", word.chars().count());
        Ok(format!("{}{}", word, self.config().password_suffix))
    }
}

/// Accepts a bare word or a JSON array of words.
fn extract_word(body: &str) -> Option<String> {
    let trimmed = body.trim();
    let word = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(words)) => words.first()?.as_str()?.trim().to_string(),
        Ok(Value::String(word)) => word.trim().to_string(),
        _ => trimmed.to_string(),
    };
    if word.is_empty() || word.chars().any(char::is_whitespace) {
        None
    } else {
        Some(word)
    }
}
