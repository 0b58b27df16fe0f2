//! JavaScript evaluation scripts
//!
//! This module contains the JavaScript code used to read content and layout
//! information from competitor pages.

/// Readiness probe: is `document.body` present yet?
pub const BODY_READY_SCRIPT: &str = r"
    (() => document.body !== null && document.body !== undefined)()
";

/// Full scroll height of the document, used to size full-page screenshots
pub const SCROLL_HEIGHT_SCRIPT: &str = r"
    (() => {
        const body = document.body;
        const root = document.documentElement;
        return Math.max(
            body ? body.scrollHeight : 0,
            root ? root.scrollHeight : 0
        );
    })()
";

/// JavaScript script to collect raw content texts
///
/// Returns a `RawPageContent`-shaped object. Only coarse upper bounds are
/// applied here; the selection heuristics run in Rust.
pub const CONTENT_SCRIPT: &str = r#"
    (() => {
        const MAX_RAW = 200;
        const textOf = (el) => ((el.innerText || el.textContent || '') + '');
        const texts = (nodes) => Array.from(nodes).slice(0, MAX_RAW).map(textOf);

        const metaTag = document.querySelector('meta[name="description"]');
        const metaDescription = metaTag ? (metaTag.getAttribute('content') || '') : null;

        const ctaElements = [];
        const seen = new Set();
        const pushAll = (nodes) => {
            for (const el of nodes) {
                if (!seen.has(el)) {
                    seen.add(el);
                    ctaElements.push(el);
                }
            }
        };
        pushAll(document.querySelectorAll('button'));
        pushAll(document.querySelectorAll('a.btn, a.button, a[role="button"], .cta'));

        const nav = document.querySelector('nav');

        return {
            title: document.title || '',
            metaDescription,
            headings: {
                h1: texts(document.querySelectorAll('h1')),
                h2: texts(document.querySelectorAll('h2')),
                h3: texts(document.querySelectorAll('h3'))
            },
            paragraphs: texts(document.querySelectorAll('p')),
            ctaCandidates: ctaElements.slice(0, MAX_RAW).map(textOf),
            navFound: nav !== null,
            navLinks: nav ? texts(nav.querySelectorAll('a')) : []
        };
    })()
"#;
