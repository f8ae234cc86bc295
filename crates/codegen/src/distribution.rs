//! Distribution packaging for `build`

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use mgw_common::WorkspaceLayout;
use mgw_runtime::deps::DistributionPackager;

/// Zips a label's `src/` and `conf/` into `target/micro-gw-<label>.zip`
pub struct ZipDistributionPackager;

impl ZipDistributionPackager {
    fn add_tree(
        zip: &mut ZipWriter<File>,
        label_dir: &Path,
        tree: &Path,
        options: SimpleFileOptions,
    ) -> Result<usize> {
        let mut files = 0;

        for entry in WalkDir::new(tree).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", tree.display()))?;
            let relative = entry
                .path()
                .strip_prefix(label_dir)
                .context("Entry outside the label directory")?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if entry.file_type().is_dir() {
                zip.add_directory(name, options)?;
            } else {
                zip.start_file(name, options)?;
                let mut source = File::open(entry.path())
                    .with_context(|| format!("Failed to open {}", entry.path().display()))?;
                io::copy(&mut source, zip)
                    .with_context(|| format!("Failed to archive {}", entry.path().display()))?;
                files += 1;
            }
        }

        Ok(files)
    }
}

impl DistributionPackager for ZipDistributionPackager {
    fn package(&self, project_root: &Path, label: &str) -> Result<PathBuf> {
        let layout = WorkspaceLayout::new(project_root).label(label);
        let src_dir = layout.src_dir();
        if !src_dir.is_dir() {
            bail!(
                "no generated sources at {}; run setup for this label first",
                src_dir.display()
            );
        }

        let target = layout.target_dir();
        fs::create_dir_all(&target)
            .with_context(|| format!("Failed to create {}", target.display()))?;

        let archive = layout.distribution_path();
        let file = File::create(&archive)
            .with_context(|| format!("Failed to create {}", archive.display()))?;
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        let mut files = 0;
        for tree in [src_dir, layout.conf_dir()] {
            if tree.is_dir() {
                files += Self::add_tree(&mut zip, layout.dir(), &tree, options)?;
            }
        }
        zip.finish().context("Failed to finalize distribution archive")?;

        tracing::info!(%label, files, archive = %archive.display(), "Created distribution");
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zip::ZipArchive;

    #[test]
    fn test_package_contains_sources_and_config() {
        let temp = TempDir::new().unwrap();
        let label_dir = temp.path().join("orders");
        fs::create_dir_all(label_dir.join("src/policies")).unwrap();
        fs::create_dir_all(label_dir.join("conf")).unwrap();
        fs::write(label_dir.join("src/orders_1_0_0.bal"), "service").unwrap();
        fs::write(label_dir.join("src/policies/application_gold.bal"), "policy").unwrap();
        fs::write(label_dir.join("conf/label-config.toml"), "[gateway]").unwrap();

        let archive = ZipDistributionPackager
            .package(temp.path(), "orders")
            .unwrap();

        assert_eq!(archive, label_dir.join("target/micro-gw-orders.zip"));
        let mut zip = ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let names: Vec<String> = zip.file_names().map(str::to_string).collect();
        assert!(names.contains(&"src/orders_1_0_0.bal".to_string()));
        assert!(names.contains(&"src/policies/application_gold.bal".to_string()));
        assert!(names.contains(&"conf/label-config.toml".to_string()));

        let mut contents = String::new();
        io::Read::read_to_string(&mut zip.by_name("src/orders_1_0_0.bal").unwrap(), &mut contents)
            .unwrap();
        assert_eq!(contents, "service");
    }

    #[test]
    fn test_package_without_sources_fails() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("orders/conf")).unwrap();

        let err = ZipDistributionPackager
            .package(temp.path(), "orders")
            .unwrap_err();
        assert!(err.to_string().contains("run setup"));
    }
}
