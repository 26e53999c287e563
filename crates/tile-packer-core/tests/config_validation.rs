use std::str::FromStr;

use tile_packer_core::prelude::*;

#[test]
fn algorithm_names_parse_case_insensitively() {
    assert_eq!(Algorithm::from_str("auto-tile").unwrap(), Algorithm::AutoTile);
    assert_eq!(Algorithm::from_str("TILE_GRID").unwrap(), Algorithm::TileGrid);
    assert_eq!(
        Algorithm::from_str("Tile-Convex-Hull").unwrap(),
        Algorithm::TileConvexHull
    );
    assert_eq!("bin-skyline".parse::<Algorithm>().unwrap(), Algorithm::BinSkyline);
    for a in [
        Algorithm::AutoTile,
        Algorithm::TileGrid,
        Algorithm::TileConvexHull,
        Algorithm::BinSkyline,
    ] {
        assert_eq!(a.to_string().parse::<Algorithm>().unwrap(), a);
    }
}

#[test]
fn unknown_algorithm_is_a_configuration_error() {
    let err = "maxrects".parse::<Algorithm>().unwrap_err();
    assert!(matches!(err, TilePackError::Configuration(_)));
    assert!(err.to_string().contains("maxrects"));
}

#[test]
fn defaults_match_serde_defaults() {
    let opts = Options::default();
    assert_eq!(opts.algorithm, Algorithm::AutoTile);
    assert_eq!(opts.tile_size, 16);
    assert_eq!(opts.padding, 1);
    assert_eq!(opts.alpha_threshold, 1);
    assert_eq!(opts.page_size, 0);
    assert!(opts.allow_rotation);
    assert!(!opts.parallel);

    let parsed: Options = serde_json::from_str("{}").expect("empty object");
    assert_eq!(parsed, opts);
    let parsed: Options =
        serde_json::from_str(r#"{"algorithm":"tile-grid","page_size":512}"#).expect("partial");
    assert_eq!(parsed.algorithm, Algorithm::TileGrid);
    assert_eq!(parsed.page_size, 512);
    assert_eq!(parsed.tile_size, 16);
}

#[test]
fn invalid_options_fail_before_images_are_read() {
    // The buffer is too short; configuration errors must win.
    let data = [0u8; 3];
    let images = vec![SourceImage::new(&data, 8, 8, 4)];

    let zero_tile = Options::builder().tile_size(0).build();
    assert!(matches!(
        pack_images(&images, &zero_tile),
        Err(TilePackError::Configuration(_))
    ));

    let ragged_page = Options::builder().tile_size(16).page_size(100).build();
    assert!(matches!(
        pack_images(&images, &ragged_page),
        Err(TilePackError::Configuration(_))
    ));
}

#[test]
fn skyline_ignores_tile_settings() {
    let opts = Options::builder()
        .algorithm(Algorithm::BinSkyline)
        .tile_size(0)
        .page_size(100)
        .build();
    assert!(opts.validate().is_ok());
}

#[test]
fn malformed_images_are_shape_errors() {
    let short = [0u8; 10];
    let images = vec![SourceImage::new(&short, 4, 4, 4).with_path("short.png")];
    match pack_images(&images, &Options::default()) {
        Err(TilePackError::ShapeExtraction { image, .. }) => assert_eq!(image, "short.png"),
        other => panic!("unexpected: {other:?}"),
    }

    let data = [0u8; 32];
    let images = vec![SourceImage::new(&data, 4, 4, 2)];
    match pack_images(&images, &Options::default()) {
        Err(TilePackError::ShapeExtraction { image, .. }) => assert_eq!(image, "#0"),
        other => panic!("unexpected: {other:?}"),
    }

    let empty: [u8; 0] = [];
    let images = vec![SourceImage::new(&empty, 0, 5, 4)];
    let skyline = Options::builder().algorithm(Algorithm::BinSkyline).build();
    assert!(matches!(
        pack_images(&images, &skyline),
        Err(TilePackError::ShapeExtraction { .. })
    ));
}
