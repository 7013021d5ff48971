pub mod phone;
pub mod text;

use std::fs;
use std::path::Path;

use crate::error::{LeadError, Result};

pub use phone::{
    is_complete_phone, sanitize_phone, tel_link, whatsapp_link, whatsapp_number,
    whatsapp_web_link,
};
pub use text::{single_line, truncate_string};

/// Ensure the parent directory of a path exists, creating it if necessary.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            LeadError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create directory at {}: {}", parent.display(), e),
            ))
        })?;
    }
    Ok(())
}

/// Mask a secret for display, keeping the first and last two characters.
pub fn mask_secret(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}
