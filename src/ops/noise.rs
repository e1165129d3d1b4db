//! Additive random noise with an injected generator.

use rand::Rng;

use crate::foundation::error::{RetroError, RetroResult};
use crate::foundation::frame::{Frame, Plane};

/// Add independent uniform noise in `[0, level * 255)` to every colour sample, saturating at 255.
///
/// The bound is truncated to an integer; a bound of zero leaves the frame unchanged. Alpha is never
/// touched.
pub fn add_uniform_noise<R: Rng + ?Sized>(
    frame: &mut Frame,
    level: f32,
    rng: &mut R,
) -> RetroResult<()> {
    if !level.is_finite() || level < 0.0 {
        return Err(RetroError::validation(
            "noise_level must be finite and >= 0",
        ));
    }
    let bound = (level * 255.0).floor().min(256.0) as u16;
    if bound == 0 {
        return Ok(());
    }
    let c = frame.channels().count();
    for px in frame.data_mut().chunks_exact_mut(c) {
        for s in &mut px[..3] {
            let n = rng.gen_range(0..bound);
            *s = (u16::from(*s) + n).min(255) as u8;
        }
    }
    Ok(())
}

/// Add independent integers drawn from `[-strength, strength)` to every sample, clamping to
/// [0, 255]. A zero strength leaves the plane unchanged.
pub fn add_signed_noise<R: Rng + ?Sized>(
    plane: &mut Plane,
    strength: i32,
    rng: &mut R,
) -> RetroResult<()> {
    if strength < 0 {
        return Err(RetroError::validation("distortion strength must be >= 0"));
    }
    if strength == 0 {
        return Ok(());
    }
    for s in plane.data_mut() {
        let n = rng.gen_range(-strength..strength);
        *s = (i32::from(*s) + n).clamp(0, 255) as u8;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/ops/noise.rs"]
mod tests;
