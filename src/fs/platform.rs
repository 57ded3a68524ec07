//! Platform-specific metadata predicates: hidden/system detection, owner and
//! group names, permission bits and writability.

use std::fs::Metadata;
use std::path::Path;

/// Decides whether an entry is a platform "system" file.
///
/// Supplied per target; a no-op on platforms without the concept.
pub type SystemFilePredicate = fn(&Path, &Metadata) -> bool;

#[cfg(windows)]
const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
#[cfg(windows)]
const FILE_ATTRIBUTE_SYSTEM: u32 = 0x4;

/// Default system-file predicate for the current platform.
#[cfg(windows)]
pub fn is_system_file(_path: &Path, metadata: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    metadata.file_attributes() & FILE_ATTRIBUTE_SYSTEM != 0
}

/// Default system-file predicate for the current platform.
#[cfg(not(windows))]
pub fn is_system_file(_path: &Path, _metadata: &Metadata) -> bool {
    false
}

/// Predicate that never reports system files.
pub fn never_system(_path: &Path, _metadata: &Metadata) -> bool {
    false
}

/// Whether an entry is hidden: the hidden attribute on Windows, a leading dot elsewhere.
#[cfg(windows)]
pub fn is_hidden(_name: &str, metadata: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

/// Whether an entry is hidden: the hidden attribute on Windows, a leading dot elsewhere.
#[cfg(not(windows))]
pub fn is_hidden(name: &str, _metadata: &Metadata) -> bool {
    name.starts_with('.')
}

#[cfg(unix)]
mod unix {
    use std::collections::HashMap;
    use std::fs::Metadata;
    use std::os::unix::fs::MetadataExt;
    use std::sync::{LazyLock, RwLock};

    use uzers::{get_effective_gid, get_effective_uid, get_group_by_gid, get_user_by_uid};

    static OWNER_CACHE: LazyLock<RwLock<HashMap<u32, String>>> =
        LazyLock::new(|| RwLock::new(HashMap::new()));
    static GROUP_CACHE: LazyLock<RwLock<HashMap<u32, String>>> =
        LazyLock::new(|| RwLock::new(HashMap::new()));

    fn cached(cache: &RwLock<HashMap<u32, String>>, id: u32, resolve: impl Fn(u32) -> Option<String>) -> String {
        if let Ok(map) = cache.read() {
            if let Some(name) = map.get(&id) {
                return name.clone();
            }
        }
        let name = resolve(id).unwrap_or_else(|| id.to_string());
        if let Ok(mut map) = cache.write() {
            map.insert(id, name.clone());
        }
        name
    }

    pub fn owner_name(metadata: &Metadata) -> String {
        cached(&OWNER_CACHE, metadata.uid(), |uid| {
            get_user_by_uid(uid).map(|u| u.name().to_string_lossy().into_owned())
        })
    }

    pub fn group_name(metadata: &Metadata) -> String {
        cached(&GROUP_CACHE, metadata.gid(), |gid| {
            get_group_by_gid(gid).map(|g| g.name().to_string_lossy().into_owned())
        })
    }

    pub fn permission_bits(metadata: &Metadata) -> u32 {
        metadata.mode() & 0o7777
    }

    /// Write permission for the effective user, judged from the mode bits.
    /// Supplementary groups are not consulted.
    pub fn is_writable(metadata: &Metadata) -> bool {
        let uid = get_effective_uid();
        if uid == 0 {
            return true;
        }
        let mode = metadata.mode();
        if metadata.uid() == uid {
            mode & 0o200 != 0
        } else if metadata.gid() == get_effective_gid() {
            mode & 0o020 != 0
        } else {
            mode & 0o002 != 0
        }
    }
}

#[cfg(unix)]
pub use unix::{group_name, is_writable, owner_name, permission_bits};

#[cfg(not(unix))]
pub fn owner_name(_metadata: &Metadata) -> String {
    String::new()
}

#[cfg(not(unix))]
pub fn group_name(_metadata: &Metadata) -> String {
    String::new()
}

/// Synthesized POSIX-style mode: everyone reads, writes unless read-only,
/// directories are traversable.
#[cfg(not(unix))]
pub fn permission_bits(metadata: &Metadata) -> u32 {
    let mut mode = 0o444;
    if !metadata.permissions().readonly() {
        mode |= 0o222;
    }
    if metadata.is_dir() {
        mode |= 0o111;
    }
    mode
}

#[cfg(not(unix))]
pub fn is_writable(metadata: &Metadata) -> bool {
    !metadata.permissions().readonly()
}
