use crate::common::DnsChange;

pub(super) const API_VERSION: &str = "2013-04-01";
pub(super) const CHANGE_BATCH_COMMENT: &str = "Managed by DNSSync";

const XML_NAMESPACE: &str = "https://route53.amazonaws.com/doc/2013-04-01/";
const CHANGE_ACTION_UPSERT: &str = "UPSERT";

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Renders a `ChangeResourceRecordSetsRequest` body upserting every change.
pub(super) fn change_batch_xml(changes: &[DnsChange], comment: &str) -> String {
    let mut body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><ChangeResourceRecordSetsRequest xmlns="{XML_NAMESPACE}"><ChangeBatch><Comment>{}</Comment><Changes>"#,
        escape(comment)
    );
    for change in changes {
        body.push_str(&format!(
            "<Change><Action>{CHANGE_ACTION_UPSERT}</Action><ResourceRecordSet>\
             <Name>{}</Name><Type>{}</Type><TTL>{}</TTL>\
             <ResourceRecords><ResourceRecord><Value>{}</Value></ResourceRecord></ResourceRecords>\
             </ResourceRecordSet></Change>",
            escape(&change.name),
            escape(&change.kind),
            change.ttl,
            escape(&change.content),
        ));
    }
    body.push_str("</Changes></ChangeBatch></ChangeResourceRecordSetsRequest>");
    body
}

/// Text content of every `<tag>` element in document order.
///
/// Route 53 responses are flat enough that a scan for the element is
/// sufficient; attributes on the element are not supported.
pub(super) fn element_texts(document: &str, tag: &str) -> Vec<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let mut texts = Vec::new();
    let mut rest = document;
    while let Some(start) = rest.find(&open) {
        rest = &rest[start + open.len()..];
        let Some(end) = rest.find(&close) else {
            break;
        };
        texts.push(unescape(&rest[..end]));
        rest = &rest[end + close.len()..];
    }
    texts
}

/// Id of the `ChangeInfo` in a successful response.
pub(super) fn change_info_id(document: &str) -> Option<String> {
    element_texts(document, "ChangeInfo")
        .first()
        .and_then(|info| element_texts(info, "Id").into_iter().next())
}

/// Builds a readable message from a Route 53 error document.
///
/// Covers both the generic `ErrorResponse` and the `InvalidChangeBatch`
/// document, which lists one `Message` per rejected change.
pub(super) fn error_message(document: &str) -> Option<String> {
    let messages = element_texts(document, "Message");
    let code = element_texts(document, "Code").into_iter().next();
    match (code, messages.is_empty()) {
        (None, true) => None,
        (Some(code), true) => Some(code),
        (None, false) => Some(messages.join("; ")),
        (Some(code), false) => Some(format!("{code}: {}", messages.join("; "))),
    }
}
