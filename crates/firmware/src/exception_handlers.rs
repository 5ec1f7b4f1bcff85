//! Cortex-M exception handlers.
//!
//! HardFault covers memory access violations (bus fault, illegal address),
//! illegal instructions, and stack overflow when flip-link has inverted the
//! memory layout so the stack bottoms out below RAM instead of walking over
//! `.bss`.
//!
//! The `#[cortex_m_rt::exception]` attribute requires ARM target intrinsics,
//! so the handler only exists on hardware builds.

/// HardFault exception handler.
///
/// Reports the stacked exception frame address over defmt/RTT — the stacked
/// PC in that frame is the faulting instruction — then halts. Returning from
/// a HardFault handler is undefined behavior on Cortex-M; the `-> !` return
/// type enforces the halt.
#[cfg(feature = "hardware")]
#[cortex_m_rt::exception]
#[allow(unsafe_code)]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    defmt::panic!(
        "HardFault! Stacked exception frame at 0x{:08X}; \
         check the stacked PC for the fault address.",
        ef as *const _ as u32
    );
}
