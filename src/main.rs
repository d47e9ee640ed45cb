use huepick::{image::io::Reader as ImageReader, DecodedSource, PaletteExtractor};

fn main() {
    env_logger::init();

    let path = std::env::args().nth(1).expect("usage: huepick <image>");

    let reader = ImageReader::open(&path).unwrap();
    let img = reader.decode().unwrap();
    let buf = img.to_rgba8();

    let palette = PaletteExtractor::from_source(DecodedSource::new(path, buf)).extract();

    for color in palette {
        println!("{color}");
    }
}
