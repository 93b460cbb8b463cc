use dicom_orientation::{
    ImageGeometry, OrientationBasis, Plane, Vector4, ViewConfig, ViewSession, physical_bounding_box,
    view_transform,
};

fn main() {
    tracing_subscriber::fmt::init();

    // slightly tilted sagittal acquisition
    let basis = OrientationBasis::from_row_column(
        Vector4::direction(0.05, 0.99, 0.0),
        Vector4::direction(0.0, 0.1, -0.99),
    );
    let image = ImageGeometry::new([192, 256, 160, 1], Vector4::direction(1.0, 1.0, 1.2), basis)
        .expect("should have built image geometry")
        .with_origin(Vector4::point(-80.0, -120.0, 110.0));
    let config = ViewConfig::default();

    for plane in Plane::ALL {
        let transform = view_transform(&image, 512.0, 512.0, plane)
            .expect("should have computed view transform");
        let bbox = physical_bounding_box(std::slice::from_ref(&image), plane, false, &config)
            .expect("should have computed bounding box");
        println!("{plane}: transform {:?}", transform.coefficients());
        println!("{plane}: bounding box {:?}", bbox.as_array());

        let mut session =
            ViewSession::new(plane, bbox, config).expect("default config should be valid");
        session
            .zoom(2.0, image.origin(), true)
            .expect("should have zoomed");
        println!("{plane}: zoomed bounding box {:?}", session.bounding_box().as_array());
    }
}
