//! Local working-copy scaffolding: template copies and minimal files.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Copy the named template's contents into `target`, creating it if needed.
pub fn copy_template(templates_dir: &Path, key: &str, target: &Path) -> Result<()> {
    let source = templates_dir.join(key);
    if !source.is_dir() {
        return Err(Error::TemplateNotFound {
            key: key.to_string(),
            path: source,
        });
    }

    fs::create_dir_all(target)?;
    copy_tree(&source, target)?;
    info!("applied template '{}' to {:?}", key, target);
    Ok(())
}

fn copy_tree(source: &Path, target: &Path) -> Result<()> {
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let dest = target.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            fs::create_dir_all(&dest)?;
            copy_tree(&entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

/// Make sure the working copy has a README and a .gitignore; existing files
/// are left alone.
pub fn ensure_minimal_files(target: &Path, name: &str, description: &str) -> Result<()> {
    fs::create_dir_all(target)?;

    let readme = target.join("README.md");
    if !readme.exists() {
        fs::write(&readme, format!("# {name}\n\n{description}\n"))?;
        debug!("wrote {:?}", readme);
    }

    let gitignore = target.join(".gitignore");
    if !gitignore.exists() {
        fs::write(&gitignore, ".DS_Store\n.env\n")?;
        debug!("wrote {:?}", gitignore);
    }

    Ok(())
}
