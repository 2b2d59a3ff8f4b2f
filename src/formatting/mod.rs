//! Zero-allocation formatting discipline
//!
//! Producers format into a per-thread scratch buffer; the worker formats
//! and emits using buffers it pre-allocates once at construction. See
//! spec.md §4.3.

mod scratch;
mod worker_buffers;

pub use scratch::{ with_reentrancy_guard, with_scratch, FormattingScratch };
pub use worker_buffers::WorkerBuffers;

/// Allocation strategy for the formatting hot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationStrategy {
    /// Producer may allocate (e.g. via `format!`); worker may allocate
    /// per-record scratch if needed.
    Dynamic,
    /// Producer uses the thread-local scratch buffer exclusively; worker
    /// uses only buffers sized once at construction.
    ZeroAlloc,
    /// Resolved to `ZeroAlloc` on 32/64-bit ARM, MIPS, and 32-bit RISC-V;
    /// `Dynamic` everywhere else.
    Auto,
}

impl AllocationStrategy {
    /// Parse from a config string (`auto|dynamic|zero_alloc`)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "dynamic" => Some(Self::Dynamic),
            "zero_alloc" => Some(Self::ZeroAlloc),
            _ => None,
        }
    }

    /// Resolve `Auto` to a concrete strategy for the current build target.
    ///
    /// Cargo features `force_zero_alloc` / `force_dynamic_alloc` override
    /// the `cfg!(target_arch = ...)` resolution for testing on platforms
    /// that don't match the target triple you want to validate.
    pub fn resolve(self) -> ResolvedStrategy {
        match self {
            Self::Dynamic => ResolvedStrategy::Dynamic,
            Self::ZeroAlloc => ResolvedStrategy::ZeroAlloc,
            Self::Auto => {
                #[cfg(feature = "force_zero_alloc")]
                {
                    return ResolvedStrategy::ZeroAlloc;
                }
                #[cfg(feature = "force_dynamic_alloc")]
                {
                    return ResolvedStrategy::Dynamic;
                }
                #[cfg(not(any(feature = "force_zero_alloc", feature = "force_dynamic_alloc")))]
                {
                    if Self::target_is_embedded_arch() {
                        ResolvedStrategy::ZeroAlloc
                    } else {
                        ResolvedStrategy::Dynamic
                    }
                }
            }
        }
    }

    const fn target_is_embedded_arch() -> bool {
        cfg!(any(target_arch = "arm", target_arch = "aarch64", target_arch = "mips"))
            || (cfg!(target_arch = "riscv32"))
    }
}

/// The strategy `AllocationStrategy::Auto` resolves to for the running build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedStrategy {
    /// Heap allocation permitted on both producer and worker sides
    Dynamic,
    /// No heap allocation on the hot path; only pre-allocated buffers used
    ZeroAlloc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        assert_eq!(AllocationStrategy::parse("auto"), Some(AllocationStrategy::Auto));
        assert_eq!(AllocationStrategy::parse("ZERO_ALLOC"), Some(AllocationStrategy::ZeroAlloc));
        assert_eq!(AllocationStrategy::parse("dynamic"), Some(AllocationStrategy::Dynamic));
        assert_eq!(AllocationStrategy::parse("bogus"), None);
    }

    #[test]
    fn test_explicit_strategies_resolve_to_themselves() {
        assert_eq!(AllocationStrategy::Dynamic.resolve(), ResolvedStrategy::Dynamic);
        assert_eq!(AllocationStrategy::ZeroAlloc.resolve(), ResolvedStrategy::ZeroAlloc);
    }
}
