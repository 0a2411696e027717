//! Installer executables on `PATH`.

use crate::command::InstallerKind;

pub fn is_pip_available() -> bool {
    InstallerKind::Pip.is_available()
}

pub fn is_pipx_available() -> bool {
    InstallerKind::Pipx.is_available()
}

pub fn is_uv_available() -> bool {
    InstallerKind::Uv.is_available()
}

/// Installers found on `PATH`, in the order pip, pipx, uv
pub fn available_installers() -> Vec<InstallerKind> {
    InstallerKind::ALL
        .into_iter()
        .filter(InstallerKind::is_available)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_installers_order() {
        let found = available_installers();
        let positions: Vec<usize> = found
            .iter()
            .filter_map(|kind| InstallerKind::ALL.iter().position(|k| k == kind))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(found.contains(&InstallerKind::Pip), is_pip_available());
        assert_eq!(found.contains(&InstallerKind::Pipx), is_pipx_available());
        assert_eq!(found.contains(&InstallerKind::Uv), is_uv_available());
    }
}
