use ellipse_fusion::{combine_tuples, ErrorEllipse};

fn main() -> Result<(), ellipse_fusion::Error> {
    // (x, y, sigma_major, sigma_minor, theta in degrees)
    let data = [
        (30.0, 71.6, 50.0, 24.0, 18.0),
        (29.2, 71.7, 23.0, 16.0, 27.0),
        (30.3, 72.3, 47.0, 5.0, -56.0),
    ];
    println!("inputs: {:?}", data);

    let fused = combine_tuples(&data)?;
    println!("fused: {:?}", fused);

    let e = ErrorEllipse::try_from(fused)?;
    println!(
        "center=({:.5}, {:.5}) sigma_major={:.4} sigma_minor={:.4} theta={:.2}°",
        e.x(),
        e.y(),
        e.sigma_major(),
        e.sigma_minor(),
        e.theta()
    );

    Ok(())
}
