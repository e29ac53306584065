//! Feed parsing for RSS 2.0 and Atom documents.
//!
//! Both formats are deserialized with `quick-xml` and mapped onto the
//! transport-neutral `ParsedFeed` shape.
//!
//! The serde deserializer matches elements by local name, so `<atom:link>`
//! collides with `<link>` and `<media:content>` with Atom `<content>`.
//! Before deserializing, prefixed tags are rewritten to `prefix_local`
//! (`media:content` → `media_content`, `dc:date` → `dc_date`) and the
//! structs below match those names.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use quick_xml::de::from_str;
use regex::{Captures, Regex};
use serde::Deserialize;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

use crate::analyze::filter::strip_tags;
use crate::ingest::types::{Enclosure, FeedEntry, MediaContent, MediaThumbnail, ParsedFeed};

// --- RSS 2.0 ---

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "dc_date")]
    dc_date: Option<String>,
    description: Option<String>,
    #[serde(rename = "content_encoded")]
    content_encoded: Option<String>,
    #[serde(rename = "media_content", default)]
    media_content: Vec<XmlMediaContent>,
    #[serde(rename = "media_thumbnail", default)]
    media_thumbnail: Vec<XmlUrl>,
    #[serde(rename = "enclosure", default)]
    enclosure: Vec<XmlEnclosure>,
}

#[derive(Debug, Deserialize)]
struct XmlMediaContent {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "@medium")]
    medium: Option<String>,
    #[serde(rename = "@type")]
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct XmlUrl {
    #[serde(rename = "@url")]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct XmlEnclosure {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "@type")]
    mime_type: Option<String>,
}

// --- Atom ---

#[derive(Debug, Deserialize)]
struct AtomFeed {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    link: Vec<AtomLink>,
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    link: Vec<AtomLink>,
    published: Option<String>,
    updated: Option<String>,
    summary: Option<AtomText>,
    content: Option<AtomText>,
    #[serde(rename = "media_content", default)]
    media_content: Vec<XmlMediaContent>,
    #[serde(rename = "media_thumbnail", default)]
    media_thumbnail: Vec<XmlUrl>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
    #[serde(rename = "@type")]
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    text: Option<String>,
}

impl AtomText {
    fn into_text(self) -> Option<String> {
        non_empty(self.text)
    }
}

/// Parse an RSS 2.0 or Atom document.
pub fn parse_feed(body: &str) -> Result<ParsedFeed> {
    let xml = scrub_html_entities_for_xml(body);
    if xml.contains("<rss") {
        parse_rss(&flatten_prefixed_tags(&xml))
    } else if xml.contains("<feed") {
        parse_atom(&flatten_prefixed_tags(&xml))
    } else {
        let preview = if body
            .chars()
            .all(|c| c.is_ascii_graphic() || c.is_whitespace())
        {
            body.chars().take(100).collect::<String>()
        } else {
            "[binary data]".to_string()
        };
        Err(anyhow!(
            "document is not RSS or Atom. Content preview: {}",
            preview
        ))
    }
}

fn parse_rss(xml: &str) -> Result<ParsedFeed> {
    let rss: Rss = from_str(xml).context("parsing rss xml")?;
    let entries = rss
        .channel
        .item
        .into_iter()
        .map(|it| {
            let content = non_empty(it.description).or(non_empty(it.content_encoded));
            FeedEntry {
                title: non_empty(it.title),
                link: non_empty(it.link),
                pub_date: non_empty(it.pub_date).or(non_empty(it.dc_date)),
                content_snippet: snippet(content.as_deref()),
                content,
                media_content: it.media_content.into_iter().map(Into::into).collect(),
                media_thumbnail: it.media_thumbnail.into_iter().map(Into::into).collect(),
                enclosure: it.enclosure.into_iter().next().map(|e| Enclosure {
                    url: non_empty(e.url),
                    mime_type: non_empty(e.mime_type),
                }),
            }
        })
        .collect();

    Ok(ParsedFeed {
        title: non_empty(rss.channel.title),
        link: non_empty(rss.channel.link),
        entries,
    })
}

fn parse_atom(xml: &str) -> Result<ParsedFeed> {
    let feed: AtomFeed = from_str(xml).context("parsing atom xml")?;
    let entries = feed
        .entry
        .into_iter()
        .map(|e| {
            let content = e
                .summary
                .and_then(AtomText::into_text)
                .or(e.content.and_then(AtomText::into_text));
            // Image links ride along as `rel="enclosure"`.
            let enclosure = e
                .link
                .iter()
                .find(|l| l.rel.as_deref() == Some("enclosure"))
                .map(|l| Enclosure {
                    url: l.href.clone(),
                    mime_type: l.mime_type.clone(),
                });
            FeedEntry {
                title: e.title.and_then(AtomText::into_text),
                link: alternate_link(&e.link),
                pub_date: non_empty(e.published).or(non_empty(e.updated)),
                content_snippet: snippet(content.as_deref()),
                content,
                media_content: e.media_content.into_iter().map(Into::into).collect(),
                media_thumbnail: e.media_thumbnail.into_iter().map(Into::into).collect(),
                enclosure,
            }
        })
        .collect();

    Ok(ParsedFeed {
        title: feed.title.and_then(AtomText::into_text),
        link: alternate_link(&feed.link),
        entries,
    })
}

/// `rel="alternate"` (or no rel) wins; otherwise the first href.
fn alternate_link(links: &[AtomLink]) -> Option<String> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.iter().find(|l| l.rel.as_deref() != Some("self")))
        .and_then(|l| non_empty(l.href.clone()))
}

impl From<XmlMediaContent> for MediaContent {
    fn from(m: XmlMediaContent) -> Self {
        Self {
            url: non_empty(m.url),
            medium: non_empty(m.medium),
            mime_type: non_empty(m.mime_type),
        }
    }
}

impl From<XmlUrl> for MediaThumbnail {
    fn from(m: XmlUrl) -> Self {
        Self {
            url: non_empty(m.url),
        }
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn snippet(content: Option<&str>) -> Option<String> {
    content.map(|c| strip_tags(c).trim().to_string())
}

/// Parse a feed timestamp: RFC 2822 (RSS) first, then RFC 3339 (Atom, `dc:date`).
pub fn parse_pub_date(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if let Ok(odt) =
        OffsetDateTime::parse(ts, &Rfc2822).or_else(|_| OffsetDateTime::parse(ts, &Rfc3339))
    {
        return DateTime::<Utc>::from_timestamp(odt.unix_timestamp(), odt.nanosecond());
    }
    // chrono is laxer about obsolete zone names ("EST", "UT").
    DateTime::parse_from_rfc2822(ts)
        .or_else(|_| DateTime::parse_from_rfc3339(ts))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

static RE_PREFIXED_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(/?)([A-Za-z_][\w.-]*):([A-Za-z_][\w.-]*)").expect("prefixed tag regex")
});

static RE_NAMED_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").expect("entity regex"));

/// `<media:content …/>` → `<media_content …/>`, `</dc:date>` → `</dc_date>`.
/// Attribute names (`xmlns:media`) are left alone.
fn flatten_prefixed_tags(xml: &str) -> String {
    RE_PREFIXED_TAG
        .replace_all(xml, "<${1}${2}_${3}")
        .into_owned()
}

/// XML only knows five entities; HTML ones leak into feeds and break the parser.
///
/// Known HTML entities are decoded with `html-escape` (re-escaped if they
/// decode to markup characters), `&nbsp;` becomes a plain space, and unknown
/// names are kept as literal text.
fn scrub_html_entities_for_xml(s: &str) -> String {
    RE_NAMED_ENTITY
        .replace_all(s, |caps: &Captures| {
            let name = &caps[1];
            match name {
                "amp" | "lt" | "gt" | "quot" | "apos" => caps[0].to_string(),
                "nbsp" => " ".to_string(),
                _ => {
                    let decoded = html_escape::decode_html_entities(&caps[0]);
                    if decoded == caps[0] {
                        format!("&amp;{name};")
                    } else {
                        html_escape::encode_text(&decoded).into_owned()
                    }
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>WHYY</title>
    <link>https://whyy.org</link>
    <item>
      <title><![CDATA[SEPTA adds late-night trains]]></title>
      <link>https://whyy.org/articles/septa-late-night/</link>
      <pubDate>Tue, 10 Feb 2026 13:00:00 +0000</pubDate>
      <description>&lt;p&gt;Service starts Friday&nbsp;night.&lt;/p&gt;</description>
      <media:content url="https://whyy.org/video.mp4" medium="video"/>
      <media:content url="https://whyy.org/img.jpg" medium="image"/>
      <enclosure url="https://whyy.org/enc.jpg" type="image/jpeg" length="1"/>
    </item>
    <item>
      <link>https://whyy.org/articles/untitled/</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn rss_items_and_extensions_are_mapped() {
        let f = parse_feed(RSS).unwrap();
        assert_eq!(f.link.as_deref(), Some("https://whyy.org"));
        assert_eq!(f.entries.len(), 2);

        let e = &f.entries[0];
        assert_eq!(e.title.as_deref(), Some("SEPTA adds late-night trains"));
        assert_eq!(e.media_content.len(), 2);
        assert_eq!(e.media_content[1].medium.as_deref(), Some("image"));
        assert_eq!(
            e.enclosure.as_ref().and_then(|x| x.mime_type.as_deref()),
            Some("image/jpeg")
        );
        assert_eq!(
            e.content_snippet.as_deref(),
            Some("Service starts Friday night.")
        );

        let bare = &f.entries[1];
        assert!(bare.title.is_none());
        assert!(bare.pub_date.is_none());
    }

    #[test]
    fn atom_entries_prefer_alternate_link_and_published() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Citizen</title>
  <link rel="self" href="https://example.test/atom.xml"/>
  <link rel="alternate" href="https://example.test/"/>
  <entry>
    <title type="html">Rec centers reopen after repairs</title>
    <link rel="alternate" href="https://example.test/rec-centers"/>
    <published>2026-02-10T12:30:00Z</published>
    <updated>2026-02-10T12:45:00Z</updated>
    <summary>Five sites are back.</summary>
  </entry>
</feed>"#;
        let f = parse_feed(xml).unwrap();
        assert_eq!(f.link.as_deref(), Some("https://example.test/"));
        let e = &f.entries[0];
        assert_eq!(e.title.as_deref(), Some("Rec centers reopen after repairs"));
        assert_eq!(e.link.as_deref(), Some("https://example.test/rec-centers"));
        assert_eq!(e.pub_date.as_deref(), Some("2026-02-10T12:30:00Z"));
        assert_eq!(e.content.as_deref(), Some("Five sites are back."));
    }

    #[test]
    fn atom_link_in_rss_channel_does_not_shadow_link() {
        let xml = r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>PhillyVoice</title>
    <atom:link href="https://www.phillyvoice.com/feed/" rel="self" type="application/rss+xml"/>
    <link>https://www.phillyvoice.com</link>
    <item><title>Broad Street Run registration opens</title><link>https://www.phillyvoice.com/a/</link></item>
  </channel>
</rss>"#;
        let f = parse_feed(xml).unwrap();
        assert_eq!(f.link.as_deref(), Some("https://www.phillyvoice.com"));
        assert_eq!(f.entries.len(), 1);
    }

    #[test]
    fn dc_date_content_encoded_and_thumbnail_are_read() {
        let xml = r#"<rss version="2.0"
  xmlns:dc="http://purl.org/dc/elements/1.1/"
  xmlns:content="http://purl.org/rss/1.0/modules/content/"
  xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <item>
      <title>Zoning board recap</title>
      <dc:date>2025-01-01T00:00:00Z</dc:date>
      <content:encoded><![CDATA[<p>Full text.</p>]]></content:encoded>
      <media:thumbnail url="https://x.test/t.jpg"/>
    </item>
  </channel>
</rss>"#;
        let f = parse_feed(xml).unwrap();
        let e = &f.entries[0];
        assert_eq!(e.pub_date.as_deref(), Some("2025-01-01T00:00:00Z"));
        assert_eq!(e.content.as_deref(), Some("<p>Full text.</p>"));
        assert_eq!(e.content_snippet.as_deref(), Some("Full text."));
        assert_eq!(e.media_thumbnail.len(), 1);
        assert_eq!(e.media_thumbnail[0].url.as_deref(), Some("https://x.test/t.jpg"));
    }

    #[test]
    fn atom_entry_with_content_and_media_content() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:media="http://search.yahoo.com/mrss/">
  <entry>
    <title>Pothole crews work overnight</title>
    <link href="https://example.test/potholes"/>
    <updated>2026-02-10T12:00:00Z</updated>
    <content type="html">&lt;p&gt;Forty streets patched.&lt;/p&gt;</content>
    <media:content url="https://example.test/pothole.jpg" medium="image"/>
  </entry>
</feed>"#;
        let f = parse_feed(xml).unwrap();
        let e = &f.entries[0];
        assert_eq!(e.content_snippet.as_deref(), Some("Forty streets patched."));
        assert_eq!(e.media_content.len(), 1);
        assert_eq!(
            e.media_content[0].url.as_deref(),
            Some("https://example.test/pothole.jpg")
        );
    }

    #[test]
    fn html_entities_are_decoded_or_kept_literal() {
        let xml = r#"<rss version="2.0"><channel>
  <item><title>Caf&eacute; &amp; bakery &ldquo;Le Bus&rdquo; expands &madeup; menu</title></item>
</channel></rss>"#;
        let f = parse_feed(xml).unwrap();
        assert_eq!(
            f.entries[0].title.as_deref(),
            Some("Café & bakery \u{201c}Le Bus\u{201d} expands &madeup; menu")
        );
    }

    #[test]
    fn prefixed_tags_are_flattened_but_attributes_are_not() {
        let out = flatten_prefixed_tags(
            r#"<rss xmlns:media="m"><media:content url="u"/><dc:date>d</dc:date></rss>"#,
        );
        assert_eq!(
            out,
            r#"<rss xmlns:media="m"><media_content url="u"/><dc_date>d</dc_date></rss>"#
        );
    }

    #[test]
    fn non_feed_documents_are_errors() {
        assert!(parse_feed("<html><body>nope</body></html>").is_err());
        assert!(parse_feed("<rss><channel>").is_err());
    }

    #[test]
    fn dates_parse_in_both_formats() {
        let want = Utc.with_ymd_and_hms(2026, 2, 10, 13, 0, 0).unwrap();
        assert_eq!(parse_pub_date("Tue, 10 Feb 2026 13:00:00 +0000"), Some(want));
        assert_eq!(parse_pub_date("Tue, 10 Feb 2026 08:00:00 -0500"), Some(want));
        assert_eq!(parse_pub_date("2026-02-10T13:00:00Z"), Some(want));
        assert_eq!(parse_pub_date("Tue, 10 Feb 2026 13:00:00 GMT"), Some(want));
        assert_eq!(parse_pub_date("yesterday-ish"), None);
    }
}
