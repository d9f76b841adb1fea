//! Event-driven `<trkpt>` extraction.
//!
//! [`TrkPtHandler`] consumes start/end/character events in document order and
//! hands one [`Point`] to its callback for every `<trkpt>` element. Only
//! `trkpt`, `ele` and `time` are interpreted; every other element is ignored
//! without disturbing the open track point.

use crate::error::{Result, TrkPtError};
use crate::point::Point;

/// Empty attribute list for elements that carry none.
pub const NO_ATTRIBUTES: &[(&str, &str)] = &[];

const TRKPT: &str = "trkpt";

enum State {
    Idle,
    TrackPoint(Context),
}

/// Per-`<trkpt>` parse state.
struct Context {
    point: Point,
    capture: Capture,
}

/// Which sub-element is currently accumulating text.
enum Capture {
    None,
    Elevation(String),
    Time(String),
}

impl Capture {
    fn take_elevation(&mut self) -> Option<String> {
        match std::mem::replace(self, Capture::None) {
            Capture::Elevation(text) => Some(text),
            other => {
                *self = other;
                None
            }
        }
    }

    fn take_time(&mut self) -> Option<String> {
        match std::mem::replace(self, Capture::None) {
            Capture::Time(text) => Some(text),
            other => {
                *self = other;
                None
            }
        }
    }
}

fn discard(_: Point) {}

/// Assembles track points from XML events and passes each to `on_point`.
pub struct TrkPtHandler<F = fn(Point)>
where
    F: FnMut(Point),
{
    state: State,
    on_point: F,
}

impl TrkPtHandler {
    /// A handler that drops every completed point. Useful for checking that an
    /// event stream is acceptable without consuming its points.
    pub fn new() -> Self {
        Self::with_callback(discard)
    }
}

impl Default for TrkPtHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FnMut(Point)> TrkPtHandler<F> {
    pub fn with_callback(on_point: F) -> Self {
        Self {
            state: State::Idle,
            on_point,
        }
    }

    /// Whether a `<trkpt>` is open and not yet closed.
    pub fn in_track_point(&self) -> bool {
        matches!(self.state, State::TrackPoint(_))
    }

    pub fn start_element<S: AsRef<str>>(&mut self, name: &str, attributes: &[(S, S)]) -> Result<()> {
        match name {
            TRKPT => {
                if self.in_track_point() {
                    return Err(TrkPtError::NestedTrackPoint);
                }
                let latitude = parse_coordinate(attributes, "lat")?;
                let longitude = parse_coordinate(attributes, "lon")?;
                self.state = State::TrackPoint(Context {
                    point: Point::new(latitude, longitude),
                    capture: Capture::None,
                });
            }
            "ele" => {
                if let State::TrackPoint(ctx) = &mut self.state {
                    ctx.capture = Capture::Elevation(String::new());
                }
            }
            "time" => {
                if let State::TrackPoint(ctx) = &mut self.state {
                    ctx.capture = Capture::Time(String::new());
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Appends text to the open `<ele>` or `<time>`; ignored anywhere else.
    pub fn char_data(&mut self, text: &str) {
        if let State::TrackPoint(Context {
            capture: Capture::Elevation(buf) | Capture::Time(buf),
            ..
        }) = &mut self.state
        {
            buf.push_str(text);
        }
    }

    pub fn end_element(&mut self, name: &str) -> Result<()> {
        match name {
            TRKPT => match std::mem::replace(&mut self.state, State::Idle) {
                State::TrackPoint(ctx) => {
                    tracing::trace!(
                        lat = ctx.point.latitude(),
                        lon = ctx.point.longitude(),
                        "track point complete"
                    );
                    (self.on_point)(ctx.point);
                }
                State::Idle => tracing::warn!("</trkpt> without an open <trkpt>, ignoring"),
            },
            "ele" => {
                if let State::TrackPoint(ctx) = &mut self.state {
                    if let Some(text) = ctx.capture.take_elevation() {
                        let parsed = text.trim().parse::<f64>();
                        let altitude =
                            parsed.map_err(|source| TrkPtError::InvalidElevation { text, source })?;
                        ctx.point.set_altitude(altitude);
                    }
                }
            }
            "time" => {
                if let State::TrackPoint(ctx) = &mut self.state {
                    if let Some(text) = ctx.capture.take_time() {
                        ctx.point.set_timestamp(text);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn parse_coordinate<S: AsRef<str>>(attributes: &[(S, S)], attribute: &'static str) -> Result<f64> {
    let value = attributes
        .iter()
        .find(|(key, _)| key.as_ref() == attribute)
        .map(|(_, value)| value.as_ref())
        .ok_or(TrkPtError::MissingAttribute {
            element: TRKPT,
            attribute,
        })?;

    value
        .parse::<f64>()
        .map_err(|_| TrkPtError::InvalidAttribute {
            element: TRKPT,
            attribute,
            value: value.to_string(),
        })
}
