//! XML parser dispatcher (component C6): a namespace-aware, incremental
//! SAX-style reader that switches between the index and pages parsers based
//! on the root element, and tolerates a parser raising mid-stream on
//! truncated input by returning whatever was accumulated so far.

mod index_parser;
mod pages_parser;

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use index_parser::IndexXmlParserState;
use pages_parser::PagesXmlParserState;

use crate::model::AbstractSitemap;
use crate::user_agent::UserAgent;

enum ConcreteParser {
    Pages(PagesXmlParserState),
    Index(IndexXmlParserState),
}

/// Parses `content` as a sitemaps.org XML document (either a `<urlset>` or
/// a `<sitemapindex>`), recursing into sub-sitemaps for the index case.
pub fn parse_xml(url: &str, content: &str, recursion_level: u32, ua: &dyn UserAgent) -> AbstractSitemap {
    let mut reader = NsReader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut concrete: Option<ConcreteParser> = None;
    let mut last_char_data = String::new();
    let mut last_was_char_data = false;

    loop {
        let (ns, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok(resolved) => resolved,
            Err(e) => {
                // Premature-end tolerance (spec §4.6): sitemaps frequently
                // get cut off mid-generation. Return whatever the concrete
                // parser accumulated rather than failing the whole document.
                tracing::error!(url, error = %e, "sitemap XML parsing failed, returning partial result");
                break;
            }
        };

        match event {
            Event::Start(ref e) => {
                last_was_char_data = false;
                let name = normalize_element_name(ns, e.local_name().as_ref());

                match &mut concrete {
                    Some(ConcreteParser::Pages(pages)) => {
                        if let Err(err) = pages.element_start(&name) {
                            tracing::error!(url, error = %err, "pages sitemap parser rejected start element");
                            break;
                        }
                    }
                    Some(ConcreteParser::Index(_)) => {}
                    None => match name.as_str() {
                        "sitemap:urlset" => {
                            concrete = Some(ConcreteParser::Pages(PagesXmlParserState::new()))
                        }
                        "sitemap:sitemapindex" => {
                            concrete = Some(ConcreteParser::Index(IndexXmlParserState::new()))
                        }
                        _ => {
                            tracing::error!(url, name = %name, "unsupported sitemap XML root element");
                            break;
                        }
                    },
                }
            }
            Event::End(ref e) => {
                let name = normalize_element_name(ns, e.local_name().as_ref());
                match &mut concrete {
                    Some(ConcreteParser::Pages(pages)) => pages.element_end(&name, &last_char_data),
                    Some(ConcreteParser::Index(index)) => index.element_end(&name, &last_char_data),
                    None => {}
                }
                last_char_data.clear();
                last_was_char_data = false;
            }
            Event::Text(ref e) => {
                let text = e.unescape().unwrap_or_default().into_owned();
                append_char_data(&mut last_char_data, &mut last_was_char_data, text);
            }
            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                append_char_data(&mut last_char_data, &mut last_was_char_data, text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match concrete {
        Some(ConcreteParser::Pages(pages)) => pages.finish(url),
        Some(ConcreteParser::Index(index)) => index.finish(url, recursion_level, ua),
        None => AbstractSitemap::InvalidSitemap {
            url: url.to_string(),
            reason: format!("No parsers support sitemap from {url}"),
        },
    }
}

/// The underlying parser may deliver text in multiple callbacks for a
/// single logical string (e.g. around entity references), so consecutive
/// text/CDATA events append; anything else resets the buffer first.
fn append_char_data(buffer: &mut String, was_char_data: &mut bool, text: String) {
    if *was_char_data {
        buffer.push_str(&text);
    } else {
        *buffer = text;
    }
    *was_char_data = true;
}

/// Rewrites `{namespace-uri}localname` into this crate's internal
/// `sitemap:localname` / `news:localname` / bare-`localname` convention
/// (spec §4.6).
fn normalize_element_name(ns: ResolveResult, local_name: &[u8]) -> String {
    let local = String::from_utf8_lossy(local_name);
    match ns {
        ResolveResult::Bound(namespace) => {
            let uri = String::from_utf8_lossy(namespace.as_ref());
            if uri.contains("/sitemap/") {
                format!("sitemap:{local}")
            } else if uri.contains("/sitemap-news/") {
                format!("news:{local}")
            } else {
                local.into_owned()
            }
        }
        _ => local.into_owned(),
    }
}
