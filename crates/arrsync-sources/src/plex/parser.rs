use arrsync_models::{MediaType, WatchlistEntry};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, trace};
use crate::error::SourceError;

/// Show-level container node
const CONTAINER_TAG: &[u8] = b"Directory";
/// Movie-level leaf node
const LEAF_TAG: &[u8] = b"Video";

/// Parse a Plex watchlist `MediaContainer` document.
///
/// Every `Directory` node is returned first, then every `Video` node, each group
/// in document order. Nodes without a `title` attribute are dropped.
///
/// The document must be well-formed: a single root element, matching end tags,
/// and no text outside the root. Anything else is `SourceError::Parse`.
pub fn parse_watchlist(xml: &str) -> Result<Vec<WatchlistEntry>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut containers = Vec::new();
    let mut leaves = Vec::new();
    let mut depth: usize = 0;
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            SourceError::Parse(format!("at byte {}: {}", reader.buffer_position(), e))
        })?;

        match event {
            Event::Start(ref e) => {
                open_element(&mut seen_root, depth)?;
                depth += 1;
                collect_node(e, &mut containers, &mut leaves)?;
            }
            Event::Empty(ref e) => {
                open_element(&mut seen_root, depth)?;
                collect_node(e, &mut containers, &mut leaves)?;
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err(SourceError::Parse("unexpected closing tag".to_string()));
                }
                depth -= 1;
            }
            Event::Text(_) | Event::CData(_) => {
                if depth == 0 {
                    return Err(SourceError::Parse("text outside the root element".to_string()));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctypes
            _ => {}
        }
    }

    if !seen_root {
        return Err(SourceError::Parse("document has no root element".to_string()));
    }
    if depth != 0 {
        return Err(SourceError::Parse(format!("{} unclosed element(s) at end of document", depth)));
    }

    debug!(
        "Parsed watchlist: {} container node(s), {} leaf node(s)",
        containers.len(),
        leaves.len()
    );

    containers.extend(leaves);
    Ok(containers)
}

fn open_element(seen_root: &mut bool, depth: usize) -> Result<(), SourceError> {
    if depth == 0 {
        if *seen_root {
            return Err(SourceError::Parse("multiple root elements".to_string()));
        }
        *seen_root = true;
    }
    Ok(())
}

fn collect_node(
    element: &BytesStart<'_>,
    containers: &mut Vec<WatchlistEntry>,
    leaves: &mut Vec<WatchlistEntry>,
) -> Result<(), SourceError> {
    let target = match element.name().as_ref() {
        CONTAINER_TAG => containers,
        LEAF_TAG => leaves,
        _ => return Ok(()),
    };

    let mut title = None;
    let mut type_ = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| SourceError::Parse(format!("bad attribute: {}", e)))?;
        let key = attr.key.as_ref();
        if key != b"title" && key != b"type" {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|e| SourceError::Parse(format!("bad attribute value: {}", e)))?
            .into_owned();
        if key == b"title" {
            title = Some(value);
        } else {
            type_ = Some(value);
        }
    }

    match title {
        Some(title) => {
            let media_type = MediaType::from_plex_type(type_.as_deref());
            trace!("Watchlist node '{}' ({})", title, media_type);
            target.push(WatchlistEntry::new(title, media_type));
        }
        None => {
            debug!(
                "Dropping {} node without a title (type: {:?})",
                String::from_utf8_lossy(element.name().as_ref()),
                type_
            );
        }
    }

    Ok(())
}
