// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password rules applied at account registration.
//!
//! Seeded demo accounts are hashed directly by the store and never pass
//! through this policy.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password uses too few character classes.
    #[error(
        "Password must mix at least {required} of: uppercase letters, lowercase letters, digits, symbols (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password repeats the account's email or name.
    #[error("Password must not match the account {field}")]
    MatchesAccountField { field: &'static str },

    /// Password and confirmation do not match.
    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,
}

/// Password policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum password length, in characters.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_complexity: 2,
        }
    }
}

impl PasswordPolicy {
    /// Validates a registration password.
    ///
    /// # Errors
    ///
    /// Returns the first rule the password breaks, checked in this order:
    /// confirmation, length, complexity, then email and name.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        email: &str,
        name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let found: usize = character_classes(password);
        if found < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found,
            });
        }

        let lowered: String = password.to_lowercase();
        if lowered == email.trim().to_lowercase() {
            return Err(PasswordPolicyError::MatchesAccountField { field: "email" });
        }
        if lowered == name.trim().to_lowercase() {
            return Err(PasswordPolicyError::MatchesAccountField { field: "name" });
        }

        Ok(())
    }
}

/// Counts the character classes present: upper, lower, digit, symbol.
fn character_classes(password: &str) -> usize {
    let classes: [fn(&char) -> bool; 4] = [
        char::is_ascii_uppercase,
        char::is_ascii_lowercase,
        char::is_ascii_digit,
        |c: &char| !c.is_alphanumeric() && !c.is_whitespace(),
    ];
    classes
        .iter()
        .filter(|class| password.chars().any(|c| class(&c)))
        .count()
}
