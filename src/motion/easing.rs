// src/motion/easing.rs - Easing curves for camera motion pacing
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EasingError {
    #[error("Invalid camera easing type value: {0}")]
    InvalidValue(u8),
}

/// Easing curve selector, addressable on the wire by its numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum EasingKind {
    #[default]
    Linear = 0,
    SmoothStep = 1,
    EaseInQuad = 2,
    EaseOutQuad = 3,
    EaseInOutQuad = 4,
    EaseInQuint = 5,
    EaseOutQuint = 6,
    EaseInOutQuint = 7,
    EaseInElastic = 8,
    EaseOutElastic = 9,
    EaseInOutElastic = 10,
}

impl TryFrom<u8> for EasingKind {
    type Error = EasingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EasingKind::Linear),
            1 => Ok(EasingKind::SmoothStep),
            2 => Ok(EasingKind::EaseInQuad),
            3 => Ok(EasingKind::EaseOutQuad),
            4 => Ok(EasingKind::EaseInOutQuad),
            5 => Ok(EasingKind::EaseInQuint),
            6 => Ok(EasingKind::EaseOutQuint),
            7 => Ok(EasingKind::EaseInOutQuint),
            8 => Ok(EasingKind::EaseInElastic),
            9 => Ok(EasingKind::EaseOutElastic),
            10 => Ok(EasingKind::EaseInOutElastic),
            other => Err(EasingError::InvalidValue(other)),
        }
    }
}

/// Maps normalized progress `t` in [0,1] to eased progress.
///
/// The elastic variants intentionally overshoot outside [0,1] strictly
/// between the endpoints; they return `t` unchanged exactly at 0 and 1.
pub fn ease(kind: EasingKind, t: f32) -> f32 {
    match kind {
        EasingKind::Linear => t,
        EasingKind::SmoothStep => t * t * (3.0 - 2.0 * t),
        EasingKind::EaseInQuad => t * t,
        EasingKind::EaseOutQuad => t * (2.0 - t),
        EasingKind::EaseInOutQuad => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        EasingKind::EaseInQuint => t * t * t * t * t,
        EasingKind::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
        EasingKind::EaseInOutQuint => {
            if t < 0.5 {
                16.0 * t * t * t * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
            }
        }
        EasingKind::EaseInElastic => ease_in_elastic(t),
        EasingKind::EaseOutElastic => ease_out_elastic(t),
        EasingKind::EaseInOutElastic => ease_in_out_elastic(t),
    }
}

fn ease_in_elastic(t: f32) -> f32 {
    const C4: f32 = 2.0 * std::f32::consts::PI / 3.0;

    if t == 0.0 || t == 1.0 {
        return t;
    }
    -(2.0f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * C4).sin()
}

fn ease_out_elastic(t: f32) -> f32 {
    const C4: f32 = 2.0 * std::f32::consts::PI / 3.0;

    if t == 0.0 || t == 1.0 {
        return t;
    }
    2.0f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * C4).sin() + 1.0
}

fn ease_in_out_elastic(t: f32) -> f32 {
    const C5: f32 = 2.0 * std::f32::consts::PI / 4.5;

    if t == 0.0 || t == 1.0 {
        return t;
    }
    if t < 0.5 {
        -(2.0f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * C5).sin()) / 2.0
    } else {
        (2.0f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * C5).sin()) / 2.0 + 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [EasingKind; 11] = [
        EasingKind::Linear,
        EasingKind::SmoothStep,
        EasingKind::EaseInQuad,
        EasingKind::EaseOutQuad,
        EasingKind::EaseInOutQuad,
        EasingKind::EaseInQuint,
        EasingKind::EaseOutQuint,
        EasingKind::EaseInOutQuint,
        EasingKind::EaseInElastic,
        EasingKind::EaseOutElastic,
        EasingKind::EaseInOutElastic,
    ];

    #[test]
    fn endpoints_are_fixed_points() {
        for kind in ALL_KINDS {
            assert_eq!(ease(kind, 0.0), 0.0, "{kind:?} at t=0");
            assert_eq!(ease(kind, 1.0), 1.0, "{kind:?} at t=1");
        }
    }

    #[test]
    fn linear_is_identity() {
        assert_eq!(ease(EasingKind::Linear, 0.25), 0.25);
        assert_eq!(ease(EasingKind::Linear, 0.75), 0.75);
    }

    #[test]
    fn smooth_step_midpoint() {
        assert_eq!(ease(EasingKind::SmoothStep, 0.5), 0.5);
        assert!(ease(EasingKind::SmoothStep, 0.25) < 0.25);
        assert!(ease(EasingKind::SmoothStep, 0.75) > 0.75);
    }

    #[test]
    fn quad_formulas() {
        assert_eq!(ease(EasingKind::EaseInQuad, 0.5), 0.25);
        assert_eq!(ease(EasingKind::EaseOutQuad, 0.5), 0.75);
        assert_eq!(ease(EasingKind::EaseInOutQuad, 0.25), 0.125);
        assert_eq!(ease(EasingKind::EaseInOutQuad, 0.75), 0.875);
    }

    #[test]
    fn elastic_overshoots_between_endpoints() {
        // ease_out_elastic rings above 1.0 shortly after its rise
        let peak = (1..100)
            .map(|i| ease(EasingKind::EaseOutElastic, i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);

        // ease_in_elastic dips below 0.0 before its final climb
        let trough = (1..100)
            .map(|i| ease(EasingKind::EaseInElastic, i as f32 / 100.0))
            .fold(f32::MAX, f32::min);
        assert!(trough < 0.0);
    }

    #[test]
    fn numeric_conversion_round_trips() {
        for value in 0u8..=10 {
            let kind = EasingKind::try_from(value).unwrap();
            assert_eq!(kind as u8, value);
        }
        assert_eq!(
            EasingKind::try_from(11),
            Err(EasingError::InvalidValue(11))
        );
    }
}
