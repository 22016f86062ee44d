//! Runtime selection between the AES-NI and portable kernels.

use core::fmt;

/// Which implementation of the round primitives a generator uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Portable byte-oriented implementation.
    #[default]
    Software,
    /// AES-NI instructions.
    Hardware,
}

impl Backend {
    /// Picks [`Backend::Hardware`] when the CPU supports it, otherwise
    /// [`Backend::Software`].
    pub fn detect() -> Self {
        let backend = if hardware_available() {
            Backend::Hardware
        } else {
            Backend::Software
        };
        tracing::debug!(%backend, "detected block backend");
        backend
    }

    /// Whether this backend can run on the current CPU.
    pub fn is_available(self) -> bool {
        match self {
            Backend::Software => true,
            Backend::Hardware => hardware_available(),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Software => f.write_str("software"),
            Backend::Hardware => f.write_str("hardware"),
        }
    }
}

/// Runtime probe for the AES instructions.
#[cfg(target_arch = "x86_64")]
pub fn hardware_available() -> bool {
    std::arch::is_x86_feature_detected!("aes") && std::arch::is_x86_feature_detected!("sse2")
}

/// Runtime probe for the AES instructions. Always false off x86_64.
#[cfg(not(target_arch = "x86_64"))]
pub fn hardware_available() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn software_is_always_available() {
        assert!(Backend::Software.is_available());
        assert_eq!(Backend::default(), Backend::Software);
    }

    #[test]
    fn detect_agrees_with_probe() {
        assert_eq!(Backend::detect() == Backend::Hardware, hardware_available());
        assert_eq!(Backend::Hardware.is_available(), hardware_available());
    }

    #[test]
    fn display_names() {
        assert_eq!(Backend::Software.to_string(), "software");
        assert_eq!(Backend::Hardware.to_string(), "hardware");
    }
}
