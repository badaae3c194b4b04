use rand::{SeedableRng, rngs::StdRng};
use scrollscape::scene::stars::{self, PALETTE, StarField, palette_colour};

#[test]
fn generates_exactly_count_stars_inside_the_cube() {
    let field = StarField::generate(200, 100.0);
    assert_eq!(field.len(), 200);
    for star in field.stars() {
        for coordinate in [star.position.x, star.position.y, star.position.z] {
            assert!((-50.0..=50.0).contains(&coordinate), "{coordinate} outside the spread");
        }
        assert!(star.colour < PALETTE.len());
    }
}

#[test]
fn colours_come_from_the_palette() {
    let mut rng = StdRng::seed_from_u64(7);
    let stars = stars::generate_with(&mut rng, 1000, 100.0);
    let palette: Vec<_> = (0..PALETTE.len()).map(palette_colour).collect();
    for star in &stars {
        assert!(palette.contains(&palette_colour(star.colour)));
    }
    // with replacement: 1000 draws hit every entry
    for colour in 0..PALETTE.len() {
        assert!(stars.iter().any(|star| star.colour == colour));
    }
}

#[test]
fn colour_batches_cover_every_star_once() {
    let field = StarField::generate(200, 100.0);
    let batches = field.colour_batches();
    assert_eq!(batches.iter().map(|(_, transforms)| transforms.len()).sum::<usize>(), 200);
    for (colour, transforms) in &batches {
        let expected = field.stars().iter().filter(|star| star.colour == *colour).count();
        assert_eq!(transforms.len(), expected);
        assert!(!transforms.is_empty());
    }
}

#[test]
fn degenerate_spreads() {
    assert!(StarField::generate(0, 100.0).is_empty());

    let flat = stars::generate(10, 0.0);
    assert!(flat.iter().all(|star| star.position == cgmath::Vector3::new(0.0, 0.0, 0.0)));
}

#[test]
fn palette_is_srgb_authored() {
    let white = palette_colour(2);
    assert!(white.to_array().iter().all(|c| (c - 1.0).abs() < 1e-5));
    // #e50000 is a dark red once linearised
    let red = palette_colour(0);
    assert!(red.r > 0.7 && red.r < 0.8);
    assert_eq!([red.g, red.b], [0.0, 0.0]);
    // out of range falls back to white
    assert_eq!(palette_colour(PALETTE.len()), white);
}
