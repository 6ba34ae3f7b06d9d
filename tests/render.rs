//! Renderer Integration Tests
//!
//! Rendering is a pure function of the corpus: the same collections must
//! produce byte-identical pages, in every format.

use noted::{
    CodeSample, HtmlRenderer, MarkdownRenderer, Reference, Renderer, SiteBuilder,
    TopicCollection, TopicEntry,
};

fn corpus() -> Vec<TopicCollection> {
    let mut collection = TopicCollection::new("2021");

    collection
        .add_entry(
            TopicEntry::new(
                "Kerberos Module",
                "The server answers 401 with `WWW-Authenticate: Negotiate`.\n\n\
                 ```bash\ncurl -I --negotiate -u : https://intranet.example.com/\n```\n",
            )
            .unwrap()
            .with_code_sample(CodeSample::new(
                "bash",
                "curl -I --negotiate -u : https://intranet.example.com/",
            ))
            .with_reference(Reference::new(
                "RFC 4559",
                "https://www.rfc-editor.org/rfc/rfc4559",
            )),
        )
        .unwrap();

    collection
        .add_entry(
            TopicEntry::new(
                "Late Binding Closures",
                "Resolved at call time, not definition time.",
            )
            .unwrap()
            .with_tag("python"),
        )
        .unwrap();

    vec![collection]
}

#[test]
fn test_markdown_render_is_byte_identical() {
    let corpus = corpus();

    let first = MarkdownRenderer.render_collection(&corpus[0]);
    let second = MarkdownRenderer.render_collection(&corpus[0]);
    assert_eq!(first, second);

    let first_index = MarkdownRenderer.render_index(&corpus);
    let second_index = MarkdownRenderer.render_index(&corpus);
    assert_eq!(first_index, second_index);
}

#[test]
fn test_html_render_is_byte_identical() {
    let corpus = corpus();

    assert_eq!(
        HtmlRenderer.render_collection(&corpus[0]),
        HtmlRenderer.render_collection(&corpus[0])
    );
    assert_eq!(
        HtmlRenderer.render_index(&corpus),
        HtmlRenderer.render_index(&corpus)
    );
}

#[test]
fn test_markdown_page_snapshot() {
    let mut collection = TopicCollection::new("2021");
    collection
        .add_entry(
            TopicEntry::new("Mutable Default Arguments", "Evaluated once, at def time.")
                .unwrap()
                .with_reference(Reference::new(
                    "Python guide",
                    "https://docs.python-guide.org/writing/gotchas/",
                )),
        )
        .unwrap();

    let page = MarkdownRenderer.render_collection(&collection);

    assert_eq!(
        page,
        "# Notes 2021\n\
         \n\
         ## Mutable Default Arguments\n\
         \n\
         Evaluated once, at def time.\n\
         \n\
         ### References\n\
         \n\
         - [Python guide](https://docs.python-guide.org/writing/gotchas/)\n"
    );
}

#[test]
fn test_pages_preserve_entry_order() {
    let corpus = corpus();

    for page in [
        MarkdownRenderer.render_collection(&corpus[0]),
        HtmlRenderer.render_collection(&corpus[0]),
    ] {
        let kerberos = page.find("Kerberos Module").unwrap();
        let closures = page.find("Late Binding Closures").unwrap();
        assert!(kerberos < closures);
    }
}

#[test]
fn test_html_page_is_escaped_and_well_formed() {
    let mut collection = TopicCollection::new("2021");
    collection
        .add_entry(
            TopicEntry::new("Generics: Vec<T> & friends", "When T: Clone, a < b holds.").unwrap(),
        )
        .unwrap();

    let page = HtmlRenderer.render_collection(&collection);

    assert!(page.contains("Vec&lt;T&gt; &amp; friends"));
    assert!(page.contains("a &lt; b"));
    assert!(!page.contains("Vec<T>"));
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.trim_end().ends_with("</html>"));
}

#[test]
fn test_site_builder_covers_all_formats_and_collections() {
    let mut second = TopicCollection::new("2022");
    second
        .add_entry(TopicEntry::new("Walrus Operator", "Assignment expressions.").unwrap())
        .unwrap();

    let mut collections = corpus();
    collections.push(second);

    let pages = SiteBuilder::default().build(&collections);
    let paths: Vec<_> = pages.iter().map(|p| p.relative_path.as_str()).collect();

    assert_eq!(
        paths,
        vec![
            "index.md",
            "2021.md",
            "2022.md",
            "index.html",
            "2021.html",
            "2022.html",
        ]
    );

    // The index links both collections in both formats
    let md_index = &pages[0].content;
    assert!(md_index.contains("[2021](2021.md)"));
    assert!(md_index.contains("[2022](2022.md)"));

    let html_index = &pages[3].content;
    assert!(html_index.contains("href=\"2021.html\""));
    assert!(html_index.contains("href=\"2022.html\""));
}
