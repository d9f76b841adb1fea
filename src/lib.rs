pub mod error;
pub mod handler;
pub mod options;
pub mod parser;
pub mod point;

use std::ops::ControlFlow;

use wasm_bindgen::prelude::*;

pub use crate::error::TrkPtError;
pub use crate::handler::{NO_ATTRIBUTES, TrkPtHandler};
pub use crate::options::ExtractOptions;
pub use crate::point::Point;

/// Extract GPX track points, returned as a JS array of point objects.
#[wasm_bindgen(js_name = extractTrackPoints)]
pub fn extract_track_points(gpx_string: &str, options: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let points = parser::collect_track_points(gpx_string, &opts)?;
    serde_wasm_bindgen::to_value(&points).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract GPX track points, returned as a JSON string.
#[wasm_bindgen(js_name = extractTrackPointsString)]
pub fn extract_track_points_string(
    gpx_string: &str,
    options: JsValue,
) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let points = parser::collect_track_points(gpx_string, &opts)?;
    serde_json::to_string(&points).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Call `callback` with each track point in document order.
/// The first exception thrown by `callback` stops reading the document and is returned.
#[wasm_bindgen(js_name = forEachTrackPoint)]
pub fn for_each_track_point(
    gpx_string: &str,
    options: JsValue,
    callback: &js_sys::Function,
) -> Result<usize, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let mut failure: Option<JsValue> = None;
    let count = parser::try_extract_from_str(gpx_string, &opts, |pt| {
        let delivered = serde_wasm_bindgen::to_value(&pt)
            .map_err(|e| JsValue::from_str(&e.to_string()))
            .and_then(|value| callback.call1(&JsValue::NULL, &value));
        match delivered {
            Ok(_) => ControlFlow::Continue(()),
            Err(e) => {
                failure = Some(e);
                ControlFlow::Break(())
            }
        }
    })?;

    match failure {
        Some(e) => Err(e),
        None => Ok(count),
    }
}

fn parse_options(options: JsValue) -> Result<ExtractOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(ExtractOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
