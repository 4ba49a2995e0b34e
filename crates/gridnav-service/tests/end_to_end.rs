use std::f64::consts::SQRT_2;
use std::io::Cursor;

use gridnav_core::{Cell, Mask, Point, partition};
use gridnav_paths::{CancelToken, path_cost};
use gridnav_service::{
    ClassifyResponse, FindPathRequest, FindPathResponse, GridService, ServiceError,
};
use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::json;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const WATER: Rgba<u8> = Rgba([0x47, 0x6a, 0x99, 255]);

fn init_logs() {
    env_logger::builder().is_test(true).try_init().ok();
}

fn png(img: &RgbaImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn find(
    mask: &Mask,
    tile_size: i32,
    start: (i32, i32),
    end: (i32, i32),
    heuristic: &str,
) -> FindPathResponse {
    let body = json!({
        "tiles": partition(mask, tile_size),
        "startX": start.0,
        "startY": start.1,
        "endX": end.0,
        "endY": end.1,
        "heuristicName": heuristic,
    });
    let req = FindPathRequest::from_json(&body.to_string()).unwrap();
    GridService::default()
        .find_path_blocking(&req, &CancelToken::new())
        .unwrap()
}

#[test]
fn open_grid_diagonal() {
    init_logs();
    let resp = find(&Mask::new(4, 4), 4, (0, 0), (3, 3), "chebyshev");
    assert_eq!(resp.path, vec![[0, 0], [1, 1], [2, 2], [3, 3]]);
    let pts: Vec<Point> = resp.points().collect();
    assert!((path_cost(&pts) - 3.0 * SQRT_2).abs() < 1e-9);
}

#[test]
fn blocked_start_gives_empty_path() {
    let mut mask = Mask::new(4, 4);
    mask.set(Point::new(0, 0), Cell::Obstacle);
    let resp = find(&mask, 4, (0, 0), (3, 3), "octile");
    assert!(resp.path.is_empty());
    assert_eq!(serde_json::to_value(&resp).unwrap(), json!({ "path": [] }));
}

#[test]
fn enclosed_goal_gives_empty_path() {
    let mask: Mask = "\
        ........
        ........
        ........
        ....###.
        ....#.#.
        ....###.
        ........
        ........"
        .parse()
        .unwrap();
    let resp = find(&mask, 4, (0, 0), (5, 4), "euclidean");
    assert!(resp.path.is_empty());
}

#[test]
fn identical_requests_give_identical_paths() {
    let mask: Mask = "\
        ..........
        .####.....
        ....#..##.
        ..#.#...#.
        ..#...#.#.
        ..#####.#.
        ........#.
        .........."
        .parse()
        .unwrap();
    for heuristic in ["manhattan", "euclidean", "octile", "chebyshev", "unknown"] {
        let a = find(&mask, 4, (0, 0), (9, 7), heuristic);
        let b = find(&mask, 4, (0, 0), (9, 7), heuristic);
        assert!(!a.path.is_empty(), "{heuristic}");
        assert_eq!(a, b, "{heuristic}");
    }
}

#[test]
fn unknown_heuristic_falls_back_to_manhattan() {
    let mask = Mask::new(6, 6);
    let fallback = find(&mask, 3, (0, 0), (5, 2), "Octile");
    let manhattan = find(&mask, 3, (0, 0), (5, 2), "manhattan");
    assert_eq!(fallback, manhattan);
}

#[test]
fn path_crosses_tile_seams() {
    let mut mask = Mask::new(12, 12);
    for y in 0..11 {
        mask.set(Point::new(6, y), Cell::Obstacle);
    }
    let resp = find(&mask, 4, (0, 0), (11, 0), "octile");
    let pts: Vec<Point> = resp.points().collect();
    assert_eq!(pts.first(), Some(&Point::new(0, 0)));
    assert_eq!(pts.last(), Some(&Point::new(11, 0)));
    assert!(pts.contains(&Point::new(6, 11)));
    for w in pts.windows(2) {
        assert_eq!(w[0].chebyshev(w[1]), 1);
        assert!(mask.is_free(w[1]));
    }
}

#[test]
fn classify_then_find_path() {
    init_logs();
    // A river of water pixels down the middle with a ford at the bottom.
    let mut img = RgbaImage::from_pixel(40, 30, WHITE);
    for y in 0..20 {
        for x in 18..22 {
            img.put_pixel(x, y, WATER);
        }
    }
    let svc = GridService::default();
    let classified = svc
        .classify_bytes_blocking(&png(&img), &CancelToken::new())
        .unwrap();
    assert_eq!((classified.width, classified.height), (40, 30));
    assert_eq!(classified.tiles.len(), 1);

    // Through the wire, as a client would store and send it back.
    let stored = serde_json::to_string(&classified).unwrap();
    let back: ClassifyResponse = serde_json::from_str(&stored).unwrap();
    assert_eq!(back, classified);

    let body = json!({
        "clusters": back.tiles,
        "startX": 2, "startY": 2, "endX": 37, "endY": 2,
        "heuristicType": "octile",
        "width": back.width, "height": back.height,
    });
    let req = FindPathRequest::from_json(&body.to_string()).unwrap();
    let resp = svc.find_path_blocking(&req, &CancelToken::new()).unwrap();
    let pts: Vec<Point> = resp.points().collect();
    assert_eq!(pts.first(), Some(&Point::new(2, 2)));
    assert_eq!(pts.last(), Some(&Point::new(37, 2)));
    // After dilation and smoothing the river still reaches row 20, so the
    // path has to pass below it.
    assert!(pts.iter().any(|p| p.y >= 21));
    assert!(pts.iter().all(|p| p.x < 40 && p.y < 30));
}

#[test]
fn corrupt_upload_is_processing_error() {
    let err = GridService::default()
        .classify_bytes_blocking(b"\x89PNG\r\n\x1a\nnot really", &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, ServiceError::Processing(_)), "{err}");
}

#[test]
fn missing_tiles_is_validation_error() {
    let err = FindPathRequest::from_json(r#"{ "startX": 0, "startY": 0, "endX": 1, "endY": 1 }"#)
        .unwrap_err();
    assert_eq!(err.kind().as_str(), "validation");

    let body = json!({
        "tiles": [],
        "startX": 0, "startY": 0, "endX": 1, "endY": 1,
        "heuristicName": "octile",
    });
    let req = FindPathRequest::from_json(&body.to_string()).unwrap();
    let err = GridService::default()
        .find_path_blocking(&req, &CancelToken::new())
        .unwrap_err();
    assert_eq!(err.kind().as_str(), "validation");
}

#[tokio::test]
async fn async_classify_and_find() {
    let mut img = RgbaImage::from_pixel(16, 16, WHITE);
    img.put_pixel(0, 0, WATER);
    let svc = GridService::default();
    let classified = svc.classify_bytes(png(&img)).await.unwrap();
    let req = FindPathRequest {
        tiles: classified.tiles,
        start_x: 15,
        start_y: 15,
        end_x: 8,
        end_y: 8,
        heuristic_name: "chebyshev".into(),
        width: Some(classified.width),
        height: Some(classified.height),
        diagonal: None,
    };
    let resp = svc.find_path(req).await.unwrap();
    assert_eq!(resp.path.len(), 8);
}

#[tokio::test]
async fn dropped_request_does_not_poison_service() {
    let svc = GridService::default();
    let req = FindPathRequest {
        tiles: partition(&Mask::new(64, 64), 32),
        start_x: 0,
        start_y: 0,
        end_x: 63,
        end_y: 63,
        heuristic_name: "octile".into(),
        width: None,
        height: None,
        diagonal: None,
    };
    // A future dropped before its first poll never starts a worker.
    drop(svc.find_path(req.clone()));
    let resp = svc.find_path(req).await.unwrap();
    assert_eq!(resp.path.len(), 64);
}

#[test]
fn far_tile_origin_is_validation_error() {
    let body = json!({
        "tiles": [{ "x": 20000, "y": 20000, "data": [[0]] }],
        "startX": 0, "startY": 0, "endX": 1, "endY": 1,
    });
    let req = FindPathRequest::from_json(&body.to_string()).unwrap();
    let err = GridService::default()
        .find_path_blocking(&req, &CancelToken::new())
        .unwrap_err();
    assert_eq!(err.kind().as_str(), "validation");
}
