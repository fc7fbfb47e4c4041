// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Health export parsing.
//!
//! The export is a single `HealthData` root whose children are `Record`
//! and `Workout` nodes. We keep running workouts (with their recognised
//! direct children) and VO2 max records. The document is streamed so large
//! exports never sit in memory as a tree.

use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::models::workout::{RUNNING_ACTIVITY, VO2_MAX_TYPE};
use crate::models::{RawSample, RawWorkout, WorkoutField};

/// Everything pulled out of one export document.
#[derive(Debug, Default)]
pub struct Extraction {
    pub workouts: Vec<RawWorkout>,
    pub samples: Vec<RawSample>,
}

/// Parse the export document at `path`.
pub fn extract_from_path<P: AsRef<Path>>(path: P) -> Result<Extraction> {
    let reader = Reader::from_file(path.as_ref()).map_err(|e| {
        PipelineError::Parse(format!("cannot open {}: {}", path.as_ref().display(), e))
    })?;
    extract(reader)
}

/// Parse an export document held in memory.
pub fn extract_from_str(xml: &str) -> Result<Extraction> {
    extract(Reader::from_str(xml))
}

/// A workout being collected while its children stream past.
struct OpenWorkout {
    workout: RawWorkout,
    depth: usize,
}

fn extract<R: BufRead>(mut reader: Reader<R>) -> Result<Extraction> {
    let mut extraction = Extraction::default();
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut current: Option<OpenWorkout> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| parse_error(&reader, e))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                if depth == 0 {
                    if seen_root {
                        return Err(PipelineError::Parse(
                            "more than one root element".to_string(),
                        ));
                    }
                    seen_root = true;
                } else {
                    handle_element(e, depth, is_empty, &mut current, &mut extraction)?;
                }
                if !is_empty {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    PipelineError::Parse("unexpected closing tag".to_string())
                })?;
                if current.as_ref().is_some_and(|open| open.depth == depth) {
                    if let Some(open) = current.take() {
                        extraction.workouts.push(open.workout);
                    }
                }
            }
            Event::Text(ref t) if depth == 0 => {
                if !t.iter().all(u8::is_ascii_whitespace) {
                    return Err(PipelineError::Parse(format!(
                        "text outside the root element at byte {}",
                        reader.buffer_position()
                    )));
                }
            }
            Event::CData(_) if depth == 0 => {
                return Err(PipelineError::Parse(
                    "CDATA outside the root element".to_string(),
                ));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(PipelineError::Parse("document has no root element".to_string()));
    }
    if depth != 0 {
        return Err(PipelineError::Parse(
            "document ended inside an open element".to_string(),
        ));
    }

    tracing::info!(
        workouts = extraction.workouts.len(),
        samples = extraction.samples.len(),
        "Extracted running workouts"
    );
    Ok(extraction)
}

/// Dispatch one opening (or self-closing) element below the root.
fn handle_element(
    e: &BytesStart<'_>,
    depth: usize,
    is_empty: bool,
    current: &mut Option<OpenWorkout>,
    extraction: &mut Extraction,
) -> Result<()> {
    // Direct child of a running workout being collected.
    if let Some(open) = current.as_mut() {
        if depth == open.depth + 1 {
            let attrs = attributes(e)?;
            let field = if attrs.contains_key("type") {
                WorkoutField::from_metadata(&attrs)
            } else if attrs.contains_key("key") {
                WorkoutField::from_statistic(&attrs)
            } else {
                None
            };
            open.workout.fields.extend(field);
        }
        return Ok(());
    }

    match e.name().as_ref() {
        b"Workout" => {
            let attrs = attributes(e)?;
            if attrs.get("workoutActivityType").map(String::as_str) != Some(RUNNING_ACTIVITY) {
                return Ok(());
            }
            let workout = RawWorkout {
                attributes: attrs,
                fields: Vec::new(),
            };
            if is_empty {
                extraction.workouts.push(workout);
            } else {
                *current = Some(OpenWorkout { workout, depth });
            }
        }
        b"Record" => {
            let attrs = attributes(e)?;
            if attrs.get("type").map(String::as_str) == Some(VO2_MAX_TYPE) {
                extraction.samples.push(sample_from(attrs)?);
            }
        }
        _ => {}
    }
    Ok(())
}

fn sample_from(mut attrs: HashMap<String, String>) -> Result<RawSample> {
    let raw_value = attrs
        .remove("value")
        .ok_or_else(|| PipelineError::Parse("VO2 max record without value".to_string()))?;
    let value = raw_value
        .trim()
        .parse::<f64>()
        .map_err(|_| PipelineError::Parse(format!("VO2 max value {:?} is not numeric", raw_value)))?;
    let creation_date = attrs.remove("creationDate").ok_or_else(|| {
        PipelineError::Parse("VO2 max record without creationDate".to_string())
    })?;
    Ok(RawSample {
        value,
        creation_date,
    })
}

/// Collect an element's attributes, unescaped.
fn attributes(e: &BytesStart<'_>) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| PipelineError::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| PipelineError::Parse(e.to_string()))?
            .into_owned();
        map.insert(key, value);
    }
    Ok(map)
}

fn parse_error<R>(reader: &Reader<R>, err: quick_xml::Error) -> PipelineError {
    PipelineError::Parse(format!(
        "at byte {}: {}",
        reader.buffer_position(),
        err
    ))
}
