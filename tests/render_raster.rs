use nodelink::{AnimationDriver, DiagramParams, RasterRenderer, Tick, generate};

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn digest_u64(bytes: &[u8]) -> u64 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for chunk in bytes.chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= (b as u64) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}

fn small_params() -> DiagramParams {
    DiagramParams {
        node_count: 3,
        random_seed: 7,
        connection_density: 1.0,
        branching_factor: 0.5,
        self_loop_chance: 0.0,
        canvas_width: 320,
        canvas_height: 240,
        ..DiagramParams::default()
    }
}

#[test]
fn raster_render_is_deterministic_and_nonempty() {
    let params = small_params();
    let state = generate(&params);

    let mut renderer = RasterRenderer::new(params.canvas_width, params.canvas_height).unwrap();
    renderer.draw(&state, &params).unwrap();
    let a = renderer.frame().unwrap();

    renderer.draw(&state, &params).unwrap();
    let b = renderer.frame().unwrap();

    assert_eq!(a.width, 320);
    assert_eq!(a.height, 240);
    assert!(a.premultiplied);
    assert_eq!(a.data.len(), 320 * 240 * 4);
    assert_eq!(digest_u64(&a.data), digest_u64(&b.data));

    // The canvas is not a flat background: stroked nodes must show up.
    let first = &a.data[0..4];
    assert!(a.data.chunks_exact(4).any(|px| px != first));
}

#[test]
fn separate_renderers_agree() {
    let params = small_params();
    let state = generate(&params);

    let mut r1 = RasterRenderer::new(params.canvas_width, params.canvas_height).unwrap();
    let mut r2 = RasterRenderer::new(params.canvas_width, params.canvas_height).unwrap();
    r1.draw(&state, &params).unwrap();
    r2.draw(&state, &params).unwrap();
    assert_eq!(
        digest_u64(&r1.frame().unwrap().data),
        digest_u64(&r2.frame().unwrap().data)
    );
}

#[test]
fn canvas_resize_follows_params() {
    let params = small_params();
    let state = generate(&params);

    let mut renderer = RasterRenderer::new(64, 64).unwrap();
    renderer.draw(&state, &params).unwrap();
    let frame = renderer.frame().unwrap();
    assert_eq!(frame.width, 320);
    assert_eq!(frame.height, 240);
}

#[test]
fn driver_renders_through_raster_backend() {
    let params = small_params();
    let mut renderer = RasterRenderer::new(params.canvas_width, params.canvas_height).unwrap();
    let mut driver = AnimationDriver::new(params);

    driver.set_params(DiagramParams {
        random_seed: 8,
        animation_speed: 5.0,
        ..small_params()
    });

    let mut frames = 0;
    loop {
        match driver.tick(&mut renderer).unwrap() {
            Tick::Idle => break,
            Tick::Frame { completed, .. } => {
                frames += 1;
                assert!(renderer.frame().is_ok());
                if completed {
                    break;
                }
            }
        }
    }
    assert_eq!(frames, 2); // speed 5.0 -> step 0.5 -> two ticks.

    let final_frame = renderer.frame().unwrap();
    let expected_state = driver.current().clone();
    let mut check = RasterRenderer::new(320, 240).unwrap();
    check.draw(&expected_state, driver.params()).unwrap();
    assert_eq!(
        digest_u64(&final_frame.data),
        digest_u64(&check.frame().unwrap().data)
    );
}
