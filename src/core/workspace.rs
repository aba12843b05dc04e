//! Per-job workspace handling: materializing the generated file map,
//! verifying required files landed, packaging the ZIP artifact, and
//! best-effort cleanup.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::warn;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::core::FileMap;
use crate::core::scaffold;

/// Write every entry of the file map under `dir`, creating parent
/// directories as needed.
pub async fn materialize(files: &FileMap, dir: &Path) -> Result<()> {
    for (rel, content) in files {
        let dest = dir.join(rel);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create directory for {rel}"))?;
        }
        tokio::fs::write(&dest, content)
            .await
            .with_context(|| format!("failed to write file {rel}"))?;
    }
    Ok(())
}

/// Confirm the required file set exists on disk after materialization.
pub async fn verify_required(dir: &Path) -> Result<()> {
    for file in scaffold::REQUIRED_FILES {
        if !dir.join(file).exists() {
            return Err(anyhow!("required file {file} is missing after materialization"));
        }
    }
    Ok(())
}

/// Package `workdir` into a ZIP at `dest`, skipping `node_modules`. The
/// archive is staged to a temp name and renamed into place so download
/// readers only ever observe a complete file.
pub fn package_zip(workdir: &Path, dest: &Path) -> Result<()> {
    let staging = dest.with_extension("zip.part");
    let file = std::fs::File::create(&staging)
        .with_context(|| format!("failed to create archive {}", staging.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    let entries = WalkDir::new(workdir)
        .into_iter()
        .filter_entry(|e| e.file_name() != "node_modules");
    for entry in entries {
        let entry = entry.context("failed to walk workspace")?;
        let rel = entry
            .path()
            .strip_prefix(workdir)
            .context("workspace entry outside workspace root")?;
        if rel.as_os_str().is_empty() {
            continue;
        }
        let name = rel.to_string_lossy().replace('\\', "/");
        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else {
            zip.start_file(name, options)?;
            let bytes = std::fs::read(entry.path())
                .with_context(|| format!("failed to read {}", entry.path().display()))?;
            zip.write_all(&bytes)?;
        }
    }
    zip.finish().context("failed to finalize archive")?;

    std::fs::rename(&staging, dest)
        .with_context(|| format!("failed to publish archive {}", dest.display()))?;
    Ok(())
}

/// Remove a partially-created workspace. Failure is logged, never escalated:
/// the job outcome stands regardless.
pub async fn remove_best_effort(dir: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(dir).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("failed to clean up workspace {}: {e}", dir.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn small_map() -> FileMap {
        let mut files = FileMap::new();
        files.insert("package.json".to_string(), "{}".to_string());
        files.insert("src/app/app.component.ts".to_string(), "export {};".to_string());
        files
    }

    #[tokio::test]
    async fn materialize_creates_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        materialize(&small_map(), tmp.path()).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("src/app/app.component.ts")).unwrap(),
            "export {};"
        );
    }

    #[tokio::test]
    async fn verify_reports_the_missing_file_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        materialize(&small_map(), tmp.path()).await.unwrap();
        let err = verify_required(tmp.path()).await.unwrap_err();
        assert!(err.to_string().contains("src/main.ts"));
    }

    #[test]
    fn zip_roundtrip_excludes_node_modules() {
        let tmp = tempfile::tempdir().unwrap();
        let workdir = tmp.path().join("ws");
        std::fs::create_dir_all(workdir.join("src")).unwrap();
        std::fs::write(workdir.join("src/main.ts"), "export {};").unwrap();
        std::fs::create_dir_all(workdir.join("node_modules/pkg")).unwrap();
        std::fs::write(workdir.join("node_modules/pkg/index.js"), "x").unwrap();

        let dest = tmp.path().join("out.zip");
        package_zip(&workdir, &dest).unwrap();
        assert!(dest.exists());
        assert!(!dest.with_extension("zip.part").exists());

        let mut archive = zip::ZipArchive::new(std::fs::File::open(&dest).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.iter().any(|n| n == "src/main.ts"));
        assert!(!names.iter().any(|n| n.contains("node_modules")));

        let mut content = String::new();
        archive
            .by_name("src/main.ts")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "export {};");
    }
}
