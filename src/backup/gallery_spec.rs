use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GallerySpecError {
    #[error("expected public-name!secret passphrase")]
    MissingSeparator,
    #[error("the gallery name is empty")]
    EmptyName,
    #[error("the passphrase is empty")]
    EmptyPassphrase,
}

/// A backup gallery as typed into the form: `public-name!secret passphrase`.
#[derive(Clone, PartialEq, Eq)]
pub struct GallerySpec {
    pub name: String,
    pub passphrase: String,
    /// The text exactly as entered; the halves above are only for checking it.
    raw: String,
}

// Keep the passphrase out of logs.
impl std::fmt::Debug for GallerySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GallerySpec")
            .field("name", &self.name)
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

impl GallerySpec {
    pub fn parse(text: &str) -> Result<Self, GallerySpecError> {
        let (name, passphrase) = text
            .split_once('!')
            .ok_or(GallerySpecError::MissingSeparator)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(GallerySpecError::EmptyName);
        }
        let passphrase = passphrase.trim();
        if passphrase.is_empty() {
            return Err(GallerySpecError::EmptyPassphrase);
        }

        Ok(Self {
            name: name.to_string(),
            passphrase: passphrase.to_string(),
            raw: text.to_string(),
        })
    }

    /// The gallery string sent in the registration request, untouched.
    pub fn as_gallery(&self) -> &str {
        &self.raw
    }
}
