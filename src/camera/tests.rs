use super::*;
use std::time::Duration;

#[test]
fn constraints_request_video_only() {
    let constraints = MediaConstraints::video_only();
    assert!(constraints.video);
    assert!(!constraints.audio);
}

#[tokio::test]
async fn stream_activates_on_first_frame() {
    let (producer, handle) = stream_pair();

    assert!(!handle.is_active());
    assert!(handle.current_frame().is_none());

    let frame = producer.push_frame();
    assert!(handle.is_active());
    assert_eq!(frame.id, 1);
    assert_eq!(handle.current_frame().unwrap().id, 1);

    producer.push_frame();
    assert_eq!(handle.current_frame().unwrap().id, 2);
    assert_eq!(producer.frame_count(), 2);
}

#[tokio::test]
async fn wait_until_active_resolves_once_frames_flow() {
    let (producer, handle) = stream_pair();

    let waiter = {
        let handle = handle.clone();
        tokio::spawn(async move { handle.wait_until_active(Duration::from_secs(1)).await })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    producer.push_frame();

    waiter.await.unwrap().unwrap();
}

#[tokio::test]
async fn wait_until_active_times_out_without_frames() {
    let (_producer, handle) = stream_pair();

    let result = handle.wait_until_active(Duration::from_millis(20)).await;
    assert!(matches!(
        result,
        Err(crate::error::BloomcamError::Camera { .. })
    ));
}

#[tokio::test]
async fn synthetic_camera_produces_frames() {
    let camera = SyntheticCamera::new(100);
    let handle = camera
        .open(&MediaConstraints::video_only())
        .await
        .unwrap();

    handle
        .wait_until_active(Duration::from_secs(1))
        .await
        .unwrap();
    assert!(camera.is_capturing());
    assert!(handle.current_frame().is_some());

    camera.close().await;
    assert!(!camera.is_capturing());
}

#[tokio::test]
async fn synthetic_camera_rejects_audio_only_constraints() {
    let camera = SyntheticCamera::default();
    let constraints = MediaConstraints {
        video: false,
        audio: true,
    };

    let result = camera.open(&constraints).await;
    assert!(matches!(
        result,
        Err(crate::error::BloomcamError::Camera { .. })
    ));
}

#[tokio::test]
async fn denied_camera_reports_permission_reason() {
    let camera = DeniedCamera::new("permission denied by user");
    let err = camera
        .open(&MediaConstraints::video_only())
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    assert!(err.to_string().contains("permission denied"));
}
