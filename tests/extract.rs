use huepick::{
    DecodedSource, DeferredSource, ImageSource, PaletteExtractor, SampleFault, FALLBACK_PALETTE, SAMPLE_DIM,
};
use image::{Rgba, RgbaImage};
use std::{thread, time::Duration};

fn uniform(r: u8, g: u8, b: u8, a: u8) -> RgbaImage {
    RgbaImage::from_pixel(SAMPLE_DIM, SAMPLE_DIM, Rgba([r, g, b, a]))
}

fn assert_hex_format(palette: &[String]) {
    for color in palette {
        assert_eq!(color.len(), 7, "bad length: {color}");
        assert!(color.starts_with('#'), "missing #: {color}");
        assert!(
            color[1..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
            "not lowercase hex: {color}"
        );
    }
}

#[test]
fn missing_locator_resolves_to_fallback() {
    let source = DecodedSource::new("", uniform(200, 50, 50, 255));
    let palette = PaletteExtractor::from_source(source).extract();

    assert_eq!(palette, FALLBACK_PALETTE.map(String::from).to_vec());
    assert_hex_format(&palette);
}

#[test]
fn missing_locator_fallback_follows_requested_count() {
    let source = DecodedSource::new("", uniform(200, 50, 50, 255));
    let palette = PaletteExtractor::from_source(source).max_colors(2).extract();
    assert_eq!(palette, vec!["#1a1a2e".to_string(), "#16213e".to_string()]);

    let source = DecodedSource::new("", uniform(200, 50, 50, 255));
    let palette = PaletteExtractor::from_source(source).max_colors(6).extract();
    assert_eq!(palette.len(), 6);
    assert_eq!(palette[5], "#141414");
}

#[test]
fn load_failure_resolves_to_fallback() {
    let (source, handle) = DeferredSource::pending("https://example.com/cover.jpg");
    handle.failed();

    let palette = PaletteExtractor::from_source(source).extract();
    assert_eq!(palette, FALLBACK_PALETTE.map(String::from).to_vec());
}

#[test]
fn dropped_load_handle_resolves_to_fallback() {
    let (source, handle) = DeferredSource::pending("https://example.com/cover.jpg");
    drop(handle);

    let palette = PaletteExtractor::from_source(source).extract();
    assert_eq!(palette, FALLBACK_PALETTE.map(String::from).to_vec());
}

#[test]
fn pending_source_waits_for_load_signal() {
    let (source, handle) = DeferredSource::pending("late.png");

    thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        handle.loaded(uniform(200, 50, 50, 255));
    });

    let palette = PaletteExtractor::from_source(source).extract();
    assert_eq!(palette[0], "#c03030");
}

#[test]
fn uniform_image_quantizes_and_pads() {
    let source = DecodedSource::new("red.png", uniform(200, 50, 50, 255));
    let palette = PaletteExtractor::from_source(source).extract();

    // round(200/24)*24 = 192, round(50/24)*24 = 48
    assert_eq!(palette, vec!["#c03030", "#141414", "#141414", "#141414"]);
    assert_hex_format(&palette);
}

#[test]
fn two_region_image_yields_two_distinct_colors() {
    let mut img = uniform(255, 0, 0, 255);
    for y in 0..SAMPLE_DIM {
        for x in SAMPLE_DIM / 2..SAMPLE_DIM {
            img.put_pixel(x, y, Rgba([0, 0, 255, 255]));
        }
    }

    let source = DecodedSource::new("split.png", img);
    let palette = PaletteExtractor::from_source(source).max_colors(2).extract();

    // equal counts, so the packed-key tie-break puts blue first; 255
    // quantizes one step past the 8-bit range and clamps back to ff
    assert_eq!(palette, vec!["#0000ff", "#ff0000"]);
}

#[test]
fn single_color_request() {
    let source = DecodedSource::new("red.png", uniform(200, 50, 50, 255));
    let palette = PaletteExtractor::from_source(source).max_colors(1).extract();
    assert_eq!(palette, vec!["#c03030"]);
}

#[test]
fn zero_color_request_is_empty() {
    let source = DecodedSource::new("red.png", uniform(200, 50, 50, 255));
    assert!(PaletteExtractor::from_source(source).max_colors(0).extract().is_empty());

    let missing = DecodedSource::new("", uniform(200, 50, 50, 255));
    assert!(PaletteExtractor::from_source(missing).max_colors(0).extract().is_empty());
}

#[test]
fn transparent_image_is_pure_padding() {
    let source = DecodedSource::new("ghost.png", uniform(255, 0, 0, 0));
    let palette = PaletteExtractor::from_source(source).extract();
    assert_eq!(palette, vec!["#141414"; 4]);
}

#[test]
fn extraction_is_idempotent() {
    let source = DecodedSource::new("red.png", uniform(200, 50, 50, 255));

    let first = PaletteExtractor::from_source(&source).extract();
    let second = PaletteExtractor::from_source(&source).extract();
    assert_eq!(first, second);
}

#[test]
fn sampling_fault_resolves_to_fallback() {
    struct TaintedSource;

    impl ImageSource for TaintedSource {
        fn locator(&self) -> Option<&str> {
            Some("tainted.png")
        }

        fn load_state(&self) -> huepick::LoadState {
            huepick::LoadState::Loaded
        }

        fn wait_loaded(&self) -> huepick::LoadState {
            huepick::LoadState::Loaded
        }

        fn sample(&self, _: u32, _: u32) -> Result<RgbaImage, SampleFault> {
            Err(SampleFault::new("cross-origin data"))
        }
    }

    let palette = PaletteExtractor::from_source(TaintedSource).extract();
    assert_eq!(palette, FALLBACK_PALETTE.map(String::from).to_vec());
}

#[test]
fn deferred_extraction_delivers_once() {
    let source = DecodedSource::new("red.png", uniform(200, 50, 50, 255));
    let rx = PaletteExtractor::from_source(source).extract_deferred();

    let palette = rx.recv().unwrap();
    assert_eq!(palette[0], "#c03030");

    // the channel is one-shot; the sender is gone after delivery
    assert!(rx.recv().is_err());
}

#[test]
fn large_images_downsample_to_bounded_cost() {
    // 512×512 source still goes through the 64×64 working buffer
    let img = RgbaImage::from_pixel(512, 512, Rgba([200, 50, 50, 255]));
    let source = DecodedSource::new("big.png", img);

    let palette = PaletteExtractor::from_source(source).extract();
    assert_eq!(palette[0], "#c03030");
}
