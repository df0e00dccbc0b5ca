//! XML field-level engine: walks a document by XPath 1.0 expressions and
//! rewrites matched nodes through a credential's encryptor/decryptor.
//!
//! Built on `sxd_document` (DOM) + `sxd_xpath` (XPath 1.0 navigator) — the
//! pure-Rust analogue of the "DOM + XPath navigator" the design calls for.

use sxd_document::dom::{ChildOfElement, Document, Element};
use sxd_document::{parser, Package};
use sxd_xpath::nodeset::Node;
use sxd_xpath::{Context, Factory};

use fieldcrypt_core::Crypto;

use crate::error::FieldError;

/// Encrypt every node matched by `paths`, in order, under `credential_name`.
///
/// `paths` models a path list with an explicit null: `None` is a null
/// element, `Some("")` an empty one — both raise
/// [`FieldError::InvalidPath`].
pub fn encrypt_xml(
    document_xml: &str,
    paths: &[Option<&str>],
    credential_name: Option<&str>,
    crypto: &Crypto,
) -> Result<String, FieldError> {
    if paths.is_empty() {
        return Err(FieldError::NoPaths);
    }

    let package = parser::parse(document_xml).map_err(|e| FieldError::parse(e.to_string()))?;
    let document = package.as_document();

    let mut encryptor = None;
    let factory = Factory::new();

    for (index, path) in paths.iter().enumerate() {
        let expr = path.filter(|p| !p.is_empty()).ok_or(FieldError::InvalidPath { index })?;

        let matches = evaluate_element_matches(&factory, &document, expr)?;
        if matches.is_empty() {
            continue;
        }
        if encryptor.is_none() {
            encryptor = Some(crypto.get_encryptor(credential_name).map_err(|e| FieldError::crypto(expr, 0, e))?);
        }
        let encryptor = encryptor.as_ref().expect("just initialized above");

        for (match_index, element) in matches.into_iter().enumerate() {
            let plaintext = if has_element_children(element) {
                serialize_children(element)
            } else {
                direct_text(element)
            };

            tracing::debug!(path = expr, match_index, "encrypting xml field");

            let ciphertext = encryptor
                .encrypt_string(&plaintext)
                .map_err(|e| FieldError::crypto(expr, match_index, e))?;
            element.set_text(&ciphertext);
        }
    }

    Ok(serialize_document(&document))
}

/// Decrypt every node matched by `paths`, symmetric to [`encrypt_xml`].
pub fn decrypt_xml(
    document_xml: &str,
    paths: &[Option<&str>],
    credential_name: Option<&str>,
    crypto: &Crypto,
) -> Result<String, FieldError> {
    if paths.is_empty() {
        return Err(FieldError::NoPaths);
    }

    let package = parser::parse(document_xml).map_err(|e| FieldError::parse(e.to_string()))?;
    let document = package.as_document();

    let mut decryptor = None;
    let factory = Factory::new();

    for (index, path) in paths.iter().enumerate() {
        let expr = path.filter(|p| !p.is_empty()).ok_or(FieldError::InvalidPath { index })?;

        let matches = evaluate_element_matches(&factory, &document, expr)?;
        if matches.is_empty() {
            continue;
        }
        if decryptor.is_none() {
            decryptor = Some(crypto.get_decryptor(credential_name).map_err(|e| FieldError::crypto(expr, 0, e))?);
        }
        let decryptor = decryptor.as_ref().expect("just initialized above");

        for (match_index, element) in matches.into_iter().enumerate() {
            let current = direct_text(element);

            tracing::debug!(path = expr, match_index, "decrypting xml field");

            let decrypted = match decryptor.decrypt_string(&current) {
                Ok(value) => value,
                Err(e) => return Err(FieldError::crypto(expr, match_index, e)),
            };

            if decrypted == current {
                // The field was never encrypted; silently skip.
                continue;
            }

            match parser::parse(&wrap_fragment(&decrypted)) {
                Ok(fragment_package) => {
                    let fragment_root = fragment_root_element(&fragment_package);
                    let cloned: Vec<ChildOfElement> = fragment_root
                        .children()
                        .into_iter()
                        .map(|child| clone_into(&document, child))
                        .collect();
                    element.set_children(&cloned);
                }
                Err(_) => element.set_text(&decrypted),
            }
        }
    }

    Ok(serialize_document(&document))
}

fn evaluate_element_matches<'d>(
    factory: &Factory,
    document: &Document<'d>,
    expr: &str,
) -> Result<Vec<Element<'d>>, FieldError> {
    let xpath = factory
        .build(expr)
        .map_err(|e| FieldError::parse(format!("invalid xpath '{expr}': {e}")))?
        .ok_or_else(|| FieldError::parse(format!("empty xpath '{expr}'")))?;

    let context = Context::new();
    let value = xpath
        .evaluate(&context, document.root())
        .map_err(|e| FieldError::parse(format!("xpath evaluation failed for '{expr}': {e}")))?;

    let nodeset = match value {
        sxd_xpath::Value::Nodeset(nodes) => nodes,
        _ => return Ok(Vec::new()),
    };

    Ok(nodeset
        .document_order()
        .into_iter()
        .filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
        .collect())
}

fn has_element_children(element: Element) -> bool {
    element.children().into_iter().any(|c| matches!(c, ChildOfElement::Element(_)))
}

fn direct_text(element: Element) -> String {
    element
        .children()
        .into_iter()
        .filter_map(|c| c.text())
        .map(|t| t.text().to_string())
        .collect()
}

fn serialize_children(element: Element) -> String {
    element.children().into_iter().map(serialize_child).collect()
}

fn serialize_child(child: ChildOfElement) -> String {
    match child {
        ChildOfElement::Element(el) => serialize_element(el),
        ChildOfElement::Text(t) => escape_text(t.text()),
        ChildOfElement::Comment(c) => format!("<!--{}-->", c.text()),
        ChildOfElement::ProcessingInstruction(pi) => match pi.value() {
            Some(value) => format!("<?{} {}?>", pi.target(), value),
            None => format!("<?{}?>", pi.target()),
        },
    }
}

fn serialize_element(element: Element) -> String {
    let name = element.name().local_part();
    let attrs: String = element
        .attributes()
        .into_iter()
        .map(|a| format!(" {}=\"{}\"", a.name().local_part(), escape_attr(a.value())))
        .collect();

    let children = element.children();
    if children.is_empty() {
        format!("<{name}{attrs}/>")
    } else {
        let inner: String = children.into_iter().map(serialize_child).collect();
        format!("<{name}{attrs}>{inner}</{name}>")
    }
}

fn serialize_document(document: &Document) -> String {
    let mut out = Vec::new();
    sxd_document::writer::format_document(document, &mut out).expect("in-memory write cannot fail");
    String::from_utf8(out).expect("serializer always emits valid utf-8")
}

fn wrap_fragment(fragment: &str) -> String {
    format!("<fieldcrypt-fragment>{fragment}</fieldcrypt-fragment>")
}

fn fragment_root_element<'d>(package: &'d Package) -> Element<'d> {
    package
        .as_document()
        .root()
        .children()
        .into_iter()
        .find_map(|c| c.element())
        .expect("wrap_fragment always produces a single root element")
}

/// Reconstruct `child` (from a different `Package`'s arena) inside `document`.
fn clone_into<'d>(document: &Document<'d>, child: ChildOfElement) -> ChildOfElement<'d> {
    match child {
        ChildOfElement::Element(el) => {
            let new_el = document.create_element(el.name().local_part());
            for attr in el.attributes() {
                new_el.set_attribute_value(attr.name().local_part(), attr.value());
            }
            let cloned_children: Vec<ChildOfElement> =
                el.children().into_iter().map(|c| clone_into(document, c)).collect();
            new_el.set_children(&cloned_children);
            ChildOfElement::Element(new_el)
        }
        ChildOfElement::Text(t) => ChildOfElement::Text(document.create_text(t.text())),
        ChildOfElement::Comment(c) => ChildOfElement::Comment(document.create_comment(c.text())),
        ChildOfElement::ProcessingInstruction(pi) => {
            ChildOfElement::ProcessingInstruction(document.create_processing_instruction(pi.target(), pi.value()))
        }
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
