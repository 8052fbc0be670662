use crate::error::{PublishError, Result};
use regex::Regex;
use std::fmt;

/// Signature verification status as reported by git's `%G?` placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureStatus {
    Good,
    GoodUnknownValidity,
    ExpiredSignature,
    ExpiredKey,
    RevokedKey,
    CannotCheck,
    Bad,
    None,
}

impl SignatureStatus {
    pub fn from_code(code: char) -> Option<Self> {
        Some(match code {
            'G' => SignatureStatus::Good,
            'U' => SignatureStatus::GoodUnknownValidity,
            'X' => SignatureStatus::ExpiredSignature,
            'Y' => SignatureStatus::ExpiredKey,
            'R' => SignatureStatus::RevokedKey,
            'E' => SignatureStatus::CannotCheck,
            'B' => SignatureStatus::Bad,
            'N' => SignatureStatus::None,
            _ => return None,
        })
    }

    /// Unsigned, bad and unverifiable commits may not be pushed.
    pub fn is_signed(&self) -> bool {
        !matches!(
            self,
            SignatureStatus::None | SignatureStatus::Bad | SignatureStatus::CannotCheck
        )
    }
}

impl fmt::Display for SignatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SignatureStatus::Good => "good signature",
            SignatureStatus::GoodUnknownValidity => "good signature, unknown validity",
            SignatureStatus::ExpiredSignature => "expired signature",
            SignatureStatus::ExpiredKey => "signed with an expired key",
            SignatureStatus::RevokedKey => "signed with a revoked key",
            SignatureStatus::CannotCheck => "signature cannot be checked",
            SignatureStatus::Bad => "bad signature",
            SignatureStatus::None => "no signature",
        };
        f.write_str(text)
    }
}

/// HEAD commit hash together with its signature status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSignature {
    pub commit: String,
    pub status: SignatureStatus,
}

impl CommitSignature {
    /// Parse one line of `git log -1 --format='%H %G?'`.
    pub fn parse(line: &str) -> Result<Self> {
        let re = Regex::new(r"^([0-9a-f]{7,64}) ([GUXYREBN])$")
            .map_err(|e| PublishError::remote(e.to_string()))?;
        let captures = re.captures(line.trim()).ok_or_else(|| {
            PublishError::remote(format!("Unexpected signature status output: '{}'", line.trim()))
        })?;

        let commit = captures[1].to_string();
        let status = captures[2]
            .chars()
            .next()
            .and_then(SignatureStatus::from_code)
            .ok_or_else(|| PublishError::remote(format!("Unknown signature status in '{}'", line)))?;

        Ok(CommitSignature { commit, status })
    }

    /// Fail with [`PublishError::Signature`] unless the commit is signed.
    pub fn verify(&self) -> Result<()> {
        if self.status.is_signed() {
            Ok(())
        } else {
            Err(PublishError::Signature {
                commit: self.commit.clone(),
                status: self.status,
            })
        }
    }
}
