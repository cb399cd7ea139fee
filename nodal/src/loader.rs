use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{LoadError, NodeId, Runtime};

pub const NODE_SUFFIX: &str = ".node";

/// `foo.node` -> `foo`. Files named just `.node` are not nodes.
pub fn node_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(NODE_SUFFIX)
        .filter(|name| !name.is_empty())
}

/// Node files under `dir`, sorted by file name.
pub fn node_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, LoadError> {
    let io_error = |source: io::Error| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            debug!("skipping non utf-8 file name {}", path.display());
            continue;
        };
        if let Some(name) = node_name(file_name) {
            files.push((name.to_string(), path.clone()));
        }
    }
    files.sort();
    Ok(files)
}

/// Adds every node file in `dir` to `runtime`, in file name order.
pub fn load_dir(runtime: &mut Runtime, dir: &Path) -> Result<Vec<NodeId>, LoadError> {
    let mut ids = Vec::new();
    for (name, path) in node_files(dir)? {
        let bytes = fs::read(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let source = String::from_utf8(bytes)
            .map_err(|_| LoadError::NotUtf8 { path: path.clone() })?;
        ids.push(runtime.add_node(&name, &source)?);
    }
    info!("loaded {} nodes from {}", ids.len(), dir.display());
    Ok(ids)
}
