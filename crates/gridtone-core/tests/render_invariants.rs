use gridtone_core::{
    AudioBuffer, ChannelLayout, Context, EngineError, GeneratorKind, RenderRequest, render,
};
use proptest::prelude::*;

fn assert_in_unit_range(buffer: &AudioBuffer) {
    for sample in buffer.samples() {
        assert!(sample.is_finite(), "non-finite sample {sample}");
        assert!((-1.0..=1.0).contains(&sample), "sample {sample} out of range");
    }
}

#[test]
fn degenerate_durations_render_silence_with_the_right_layout() {
    for kind in GeneratorKind::all() {
        for duration in [0.0, -1.0, 1e-9, f64::NAN] {
            let buffer = kind.generate(44_100, duration, &Context::new());
            assert_eq!(buffer.frames(), 0, "{kind} at {duration}");
            assert_eq!(buffer.layout(), kind.channel_layout());
        }
    }
}

#[test]
fn single_frame_renders_do_not_panic() {
    for kind in GeneratorKind::all() {
        let buffer = kind.generate(1_000, 0.001, &Context::cell(1, 2, 0));
        assert_eq!(buffer.frames(), 1, "{kind}");
        assert_in_unit_range(&buffer);
    }
}

#[test]
fn stereo_generators_mirror_both_channels() {
    for kind in GeneratorKind::all() {
        let buffer = kind.generate(22_050, 0.5, &Context::cell(1, 3, 0));
        match kind.channel_layout() {
            ChannelLayout::Stereo => {
                assert_eq!(buffer.channel_count(), 2, "{kind}");
                assert_eq!(buffer.channel(0), buffer.channel(1), "{kind}");
            }
            ChannelLayout::Mono => assert_eq!(buffer.channel_count(), 1, "{kind}"),
        }
    }
}

#[test]
fn frame_count_is_the_floor_of_rate_times_duration() {
    let buffer = GeneratorKind::House128.generate(44_100, 1.875, &Context::new());
    assert_eq!(buffer.frames(), 82_687);
}

#[test]
fn zero_sample_rate_is_an_engine_error() {
    let request = RenderRequest::new(GeneratorKind::SkipDensity, 0, 1.0);
    assert!(matches!(
        render(&request),
        Err(EngineError::InvalidSampleRate(0))
    ));
    assert!(GeneratorKind::SkipDensity.generate(0, 1.0, &Context::new()).is_empty());
}

#[test]
fn unknown_context_keys_are_ignored() {
    let plain = GeneratorKind::GlitchWash.generate(8_000, 0.25, &Context::new());
    let noisy = GeneratorKind::GlitchWash.generate(
        8_000,
        0.25,
        &Context::new().with("brightness", 42.0),
    );
    assert_eq!(plain, noisy);
}

fn kind_strategy() -> impl Strategy<Value = GeneratorKind> {
    prop::sample::select(GeneratorKind::all().to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    #[test]
    fn every_render_stays_in_unit_range(
        kind in kind_strategy(),
        sample_rate in 100_u32..16_000,
        duration in -0.5_f64..0.6,
        cells_total in -3_i64..40,
        cell_index in -5_i64..60,
        track_index in -2_i64..6,
    ) {
        let context = Context::cell(cell_index, cells_total, track_index);
        let buffer = kind.generate(sample_rate, duration, &context);
        for sample in buffer.samples() {
            prop_assert!(sample.is_finite());
            prop_assert!((-1.0..=1.0).contains(&sample));
        }
        prop_assert_eq!(buffer.layout(), kind.channel_layout());
    }
}
