use super::*;

#[test]
fn new_rejects_mismatched_length() {
    let err = Frame::new(2, 2, Channels::Rgb, vec![0u8; 11]).unwrap_err();
    assert!(matches!(err, RetroError::ChannelShape(_)));
}

#[test]
fn from_raw_rejects_unsupported_channel_counts() {
    for count in [1usize, 2, 5] {
        let err = Frame::from_raw(1, 1, count, vec![0u8; count]).unwrap_err();
        assert!(matches!(err, RetroError::ChannelShape(_)));
    }
}

#[test]
fn zero_sized_frames_are_geometry_errors() {
    let err = Frame::new(0, 4, Channels::Rgb, Vec::new()).unwrap_err();
    assert!(matches!(err, RetroError::Geometry(_)));
}

#[test]
fn split_and_reattach_alpha_round_trips() {
    let data = vec![1u8, 2, 3, 40, 5, 6, 7, 80];
    let frame = Frame::new(2, 1, Channels::Rgba, data.clone()).unwrap();

    let (rgb, alpha) = frame.split_alpha();
    let alpha = alpha.unwrap();
    assert_eq!(rgb.channels(), Channels::Rgb);
    assert_eq!(rgb.data(), &[1, 2, 3, 5, 6, 7]);
    assert_eq!(alpha.data(), &[40, 80]);

    let back = rgb.with_alpha(&alpha).unwrap();
    assert_eq!(back.data(), data.as_slice());
}

#[test]
fn split_alpha_on_rgb_is_passthrough() {
    let frame = Frame::from_pixel(3, 2, &[9, 8, 7]).unwrap();
    let (rgb, alpha) = frame.split_alpha();
    assert!(alpha.is_none());
    assert_eq!(rgb, frame);
}

#[test]
fn planes_interleave_in_rgb_order() {
    let r = Plane::filled(2, 1, 10).unwrap();
    let g = Plane::filled(2, 1, 20).unwrap();
    let b = Plane::filled(2, 1, 30).unwrap();
    let frame = Frame::from_rgb_planes(&r, &g, &b).unwrap();
    assert_eq!(frame.pixel(1, 0), &[10, 20, 30]);
    assert_eq!(frame.channel_plane(1).unwrap(), g);
}

#[test]
fn from_gray_replicates_samples() {
    let plane = Plane::new(2, 1, vec![0, 255]).unwrap();
    let frame = Frame::from_gray(&plane);
    assert_eq!(frame.data(), &[0, 0, 0, 255, 255, 255]);
}
