/// Number of frames covered by `duration_seconds` at `sample_rate`, truncated toward zero.
///
/// Non-positive and non-finite durations yield zero frames.
#[must_use]
pub fn sample_count(sample_rate: u32, duration_seconds: f64) -> usize {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return 0;
    }

    let frames = f64::from(sample_rate) * duration_seconds;
    if frames < 1.0 { 0 } else { frames as usize }
}

#[must_use]
pub fn step_seconds(bpm: f64, steps_per_beat: u32) -> f64 {
    if bpm <= 0.0 || steps_per_beat == 0 {
        return 0.0;
    }

    let beat = 60.0 / bpm;
    beat / f64::from(steps_per_beat)
}

#[must_use]
pub fn steps_in_duration(duration_seconds: f64, step_seconds: f64) -> usize {
    if step_seconds <= 0.0 || !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return 0;
    }

    (duration_seconds / step_seconds) as usize
}

/// First frame of `step`, truncated toward zero.
#[must_use]
pub fn step_onset_sample(step: usize, step_seconds: f64, sample_rate: u32) -> usize {
    (step as f64 * step_seconds * f64::from(sample_rate)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_truncates_toward_zero() {
        assert_eq!(sample_count(44_100, 1.875), 82_687);
        assert_eq!(sample_count(48_000, 0.5), 24_000);
        assert_eq!(sample_count(10, 0.05), 0);
    }

    #[test]
    fn degenerate_durations_have_no_frames() {
        assert_eq!(sample_count(44_100, 0.0), 0);
        assert_eq!(sample_count(44_100, -1.0), 0);
        assert_eq!(sample_count(44_100, f64::NAN), 0);
        assert_eq!(sample_count(0, 2.0), 0);
    }

    #[test]
    fn one_house_bar_has_sixteen_steps() {
        let step = step_seconds(128.0, 4);
        assert!((step - 0.117_187_5).abs() < 1e-12);
        assert_eq!(steps_in_duration(1.875, step), 16);
    }

    #[test]
    fn step_onsets_land_on_the_grid() {
        let step = step_seconds(128.0, 4);
        assert_eq!(step_onset_sample(0, step, 44_100), 0);
        assert_eq!(step_onset_sample(4, step, 44_100), 20_671);
        assert_eq!(step_onset_sample(8, step, 44_100), 41_343);
    }
}
