use std::cell::Cell;
use std::io::BufRead;
use std::ops::ControlFlow;

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;

use crate::error::{Result, TrkPtError};
use crate::handler::TrkPtHandler;
use crate::options::ExtractOptions;
use crate::point::Point;

/// Extract every track point of a GPX document held in memory.
/// Returns the number of points delivered to `on_point`.
pub fn extract_from_str<F: FnMut(Point)>(
    xml: &str,
    opts: &ExtractOptions,
    mut on_point: F,
) -> Result<usize> {
    try_extract_from_str(xml, opts, |pt| {
        on_point(pt);
        ControlFlow::Continue(())
    })
}

/// Like [`extract_from_str`], but stops reading the document as soon as
/// `on_point` returns [`ControlFlow::Break`].
pub fn try_extract_from_str<F: FnMut(Point) -> ControlFlow<()>>(
    xml: &str,
    opts: &ExtractOptions,
    on_point: F,
) -> Result<usize> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().check_end_names = opts.check_end_names;
    drive(reader, opts, on_point)
}

/// Extract every track point of a GPX document read incrementally from `source`.
pub fn extract_from_reader<R: BufRead, F: FnMut(Point)>(
    source: R,
    opts: &ExtractOptions,
    mut on_point: F,
) -> Result<usize> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().check_end_names = opts.check_end_names;
    let buffered = Buffered {
        reader,
        buf: Vec::new(),
    };
    drive(buffered, opts, |pt| {
        on_point(pt);
        ControlFlow::Continue(())
    })
}

/// Collect all track points of `xml` in document order.
pub fn collect_track_points(xml: &str, opts: &ExtractOptions) -> Result<Vec<Point>> {
    let mut points = Vec::new();
    extract_from_str(xml, opts, |pt| points.push(pt))?;
    Ok(points)
}

/// A quick-xml reader yielding one event at a time.
trait EventSource {
    fn next_event(&mut self) -> std::result::Result<Event<'_>, quick_xml::Error>;
}

impl<'a> EventSource for Reader<&'a [u8]> {
    fn next_event(&mut self) -> std::result::Result<Event<'_>, quick_xml::Error> {
        self.read_event()
    }
}

/// Reader over a `BufRead` together with its event buffer.
struct Buffered<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
}

impl<R: BufRead> EventSource for Buffered<R> {
    fn next_event(&mut self) -> std::result::Result<Event<'_>, quick_xml::Error> {
        self.buf.clear();
        self.reader.read_event_into(&mut self.buf)
    }
}

fn drive<S, F>(mut source: S, opts: &ExtractOptions, mut on_point: F) -> Result<usize>
where
    S: EventSource,
    F: FnMut(Point) -> ControlFlow<()>,
{
    let mut count = 0;
    let stopped = Cell::new(false);
    let mut driver = Driver::new(opts, |pt| {
        count += 1;
        if on_point(pt).is_break() {
            stopped.set(true);
        }
    });
    loop {
        let event = source.next_event()?;
        if driver.dispatch(event)? {
            driver.finish()?;
            break;
        }
        if stopped.get() {
            tracing::debug!("extraction stopped by callback");
            break;
        }
    }

    tracing::debug!(count, "extracted track points");
    Ok(count)
}

/// Translates quick-xml events into handler calls.
struct Driver<'o, F: FnMut(Point)> {
    handler: TrkPtHandler<F>,
    opts: &'o ExtractOptions,
}

impl<'o, F: FnMut(Point)> Driver<'o, F> {
    fn new(opts: &'o ExtractOptions, on_point: F) -> Self {
        Self {
            handler: TrkPtHandler::with_callback(on_point),
            opts,
        }
    }

    /// Feed one event to the handler. Returns `true` once the document ends.
    fn dispatch(&mut self, event: Event<'_>) -> Result<bool> {
        match event {
            Event::Start(e) => self.start(&e)?,
            Event::Empty(e) => {
                self.start(&e)?;
                let name = self.element_name(e.name())?;
                self.handler.end_element(name)?;
            }
            Event::End(e) => {
                let name = self.element_name(e.name())?;
                self.handler.end_element(name)?;
            }
            Event::Text(e) => {
                self.handler.char_data(std::str::from_utf8(e.as_ref())?);
            }
            Event::CData(e) => {
                self.handler.char_data(std::str::from_utf8(e.as_ref())?);
            }
            Event::GeneralRef(e) => {
                // Character references (&#60; &#x3C;) and the predefined entities
                if let Some(ch) = e.resolve_char_ref().map_err(quick_xml::Error::from)? {
                    self.handler.char_data(ch.encode_utf8(&mut [0; 4]));
                } else {
                    let name = std::str::from_utf8(e.as_ref())?;
                    let replacement = resolve_predefined_entity(name)
                        .ok_or_else(|| TrkPtError::UnknownEntity(name.to_string()))?;
                    self.handler.char_data(replacement);
                }
            }
            Event::Eof => return Ok(true),
            _ => {}
        }
        Ok(false)
    }

    fn start(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let mut attributes = Vec::new();
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|e| TrkPtError::XmlParse(e.into()))?;
            let key = self.element_name(attr.key)?.to_string();
            let value = attr
                .unescape_value()
                .map_err(quick_xml::Error::from)?
                .into_owned();
            attributes.push((key, value));
        }
        let name = self.element_name(e.name())?;
        self.handler.start_element(name, &attributes)
    }

    fn element_name<'n>(&self, name: QName<'n>) -> Result<&'n str> {
        let bytes = if self.opts.match_local_names {
            name.local_name().into_inner()
        } else {
            name.into_inner()
        };
        Ok(std::str::from_utf8(bytes)?)
    }

    fn finish(&self) -> Result<()> {
        if self.handler.in_track_point() {
            return Err(TrkPtError::UnterminatedTrackPoint);
        }
        Ok(())
    }
}
