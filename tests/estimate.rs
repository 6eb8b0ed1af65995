use image::{GrayImage, ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};
use pixcost::estimation::{estimate, BlockDiffCoder, EstimatorConfig, EventKind, Scheme};
use pixcost::grid::{open_grid, GridError, PixelGrid};
use pixcost::scan::scan_len;
use rand::{rngs::ThreadRng, Rng};
use std::path::PathBuf;

// Returns a path in the temporary directory that is unique to this test.
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("pixcost-{}-{}.png", std::process::id(), name))
}

// Returns a random image whose channels only take a few distinct values,
// so that every scheme finds some matches.
fn random_rgb(width: u32, height: u32, rng: &mut ThreadRng) -> RgbImage {
    let mut image = ImageBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let base: u8 = rng.gen_range(100..110);
            let (a, b, c) = (base, base + rng.gen_range(0..3), rng.gen());
            image.put_pixel(x, y, Rgb([a, b, c]));
        }
    }
    image
}

fn all_schemes() -> Vec<Scheme> {
    let mut schemes = Scheme::all().to_vec();
    schemes.extend([
        Scheme::OffsetOnly { lookback_bits: 0 },
        Scheme::OffsetOrDiff { lookback_bits: 5 },
        Scheme::DiffBlock { diff_bits: 1 },
        Scheme::MovingAverage {
            diff_bits: 4,
            rle_bits: 3,
        },
    ]);
    schemes
}

#[test]
fn test_event_totals() {
    let dimensions = vec![(1, 1), (2, 1), (1, 2), (4, 7), (33, 20), (1, 100), (100, 1)];
    let mut rng = rand::thread_rng();

    for (width, height) in dimensions {
        let grid = PixelGrid::from(&random_rgb(width, height, &mut rng));
        let expected = (width * height - 1) as u64;
        assert_eq!(scan_len(&grid) as u64, expected);

        for scheme in all_schemes() {
            let report = estimate(&grid, scheme, EstimatorConfig::default());
            for chan in 0..3 {
                assert_eq!(report.channel(chan).events(), expected, "{:?}", scheme);
            }
            if let Some(stats) = report.lookback() {
                assert_eq!(stats.resolved().iter().sum::<u64>(), expected);
            }
        }
    }
}

#[test]
fn test_ratios_are_bounded() {
    let mut rng = rand::thread_rng();
    let grid = PixelGrid::from(&random_rgb(64, 48, &mut rng));

    for scheme in all_schemes() {
        let report = estimate(&grid, scheme, EstimatorConfig::default());
        assert!(report.ratio() >= 0.0);
        // Only the diff block can exceed its worst case, by terminating blocks.
        if !matches!(scheme, Scheme::DiffBlock { .. }) {
            assert!(report.ratio() <= 1.0, "{:?}", scheme);
        }
        let mean = report.channel_ratios().iter().sum::<f64>() / 3.0;
        assert!((mean - report.ratio()).abs() < 1e-12);
    }
}

#[test]
fn test_estimation_is_idempotent() {
    let mut rng = rand::thread_rng();
    let grid = PixelGrid::from(&random_rgb(50, 50, &mut rng));

    for scheme in all_schemes() {
        let first = estimate(&grid, scheme, EstimatorConfig::default());
        let second = estimate(&grid, scheme, EstimatorConfig::default());
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }
}

#[test]
fn test_parallel_channels_match_sequential() {
    let mut rng = rand::thread_rng();
    let image = random_rgb(40, 30, &mut rng);
    let grid = PixelGrid::from(&image);
    let coder = BlockDiffCoder::new(4, EstimatorConfig::default());
    let report = estimate(&grid, Scheme::diff_block(), EstimatorConfig::default());

    let len = scan_len(&grid);
    for chan in 0..3 {
        let ledger = coder.code_channel((0..len).map(|idx| grid.sample(idx, chan)));
        assert_eq!(&ledger, report.channel(chan));
    }
}

#[test]
fn test_uniform_image_offset_only() {
    let image = RgbImage::from_pixel(64, 64, Rgb([3, 141, 59]));
    let grid = PixelGrid::from(&image);
    let report = estimate(&grid, Scheme::offset_only(), EstimatorConfig::default());

    let resolved = report.lookback().unwrap().resolved();
    assert_eq!(resolved, [2, 0, 0, 64 * 64 - 3]);
    for chan in 0..3 {
        let offsets: Vec<_> = report.lookback().unwrap().offsets(chan).collect();
        assert_eq!(offsets, vec![(-1, 64 * 64 - 3)]);
        assert_eq!(report.channel(chan).count(EventKind::Literal), 2);
    }
    assert!((report.ratio() - 2.0 / 8.0).abs() < 0.01);
}

#[test]
fn test_open_png() {
    let mut rng = rand::thread_rng();
    let image = random_rgb(17, 9, &mut rng);
    let path = temp_path("rgb");
    image.save(&path).unwrap();

    let grid = open_grid(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!((grid.rows(), grid.cols()), (9, 17));
    assert_eq!(grid, PixelGrid::from(&image));
    for (x, y, pixel) in image.enumerate_pixels() {
        let idx = (y * 17 + x) as usize;
        assert_eq!(grid.pixel(idx), pixel.0.map(i32::from));
    }
}

#[test]
fn test_open_png_drops_alpha() {
    let image = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 40]));
    let path = temp_path("rgba");
    image.save(&path).unwrap();

    let grid = open_grid(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(grid, PixelGrid::filled(2, 3, [10, 20, 30]));
}

#[test]
fn test_open_grayscale_fails() {
    let image = GrayImage::new(4, 4);
    let path = temp_path("gray");
    image.save(&path).unwrap();

    let result = open_grid(&path);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(GridError::MalformedChannel { found: 1 })));
}

#[test]
fn test_open_missing_file_fails() {
    let path = temp_path("does-not-exist");
    assert!(matches!(
        open_grid(&path),
        Err(GridError::SourceUnavailable { .. })
    ));
}

#[test]
fn test_open_garbage_fails() {
    let path = temp_path("garbage");
    std::fs::write(&path, b"definitely not an image").unwrap();

    let result = open_grid(&path);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(GridError::SourceUnavailable { .. })));
}
