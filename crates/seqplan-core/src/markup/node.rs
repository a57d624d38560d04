//! Markup node tree.

/// A node in a parsed markup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data, entity references already unescaped. CDATA sections
    /// are reported as text too.
    Text(String),
    Comment(String),
}

/// A markup element with its attributes (in document order) and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

/// A `name="value"` attribute pair. The value is unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Node {
    /// Return the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) | Node::Comment(_) => None,
        }
    }
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Value of the first attribute with exactly this name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }

    /// Direct child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Every descendant element (not including `self`) whose name equals
    /// `name` exactly, in document order.
    ///
    /// Matches nested inside a match are included as well.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        collect_named(self, name, &mut found);
        found
    }
}

fn collect_named<'a>(element: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
    for child in element.child_elements() {
        if child.name == name {
            found.push(child);
        }
        collect_named(child, name, found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, children: Vec<Node>) -> Element {
        Element {
            name: name.to_string(),
            attributes: Vec::new(),
            children,
        }
    }

    #[test]
    fn descendants_named_is_preorder() {
        // <root><plan id=1><plan id=2/></plan><other><plan id=3/></other></root>
        let mut inner = element("plan", vec![]);
        inner.attributes.push(Attribute {
            name: "id".into(),
            value: "2".into(),
        });
        let mut outer = element("plan", vec![Node::Element(inner)]);
        outer.attributes.push(Attribute {
            name: "id".into(),
            value: "1".into(),
        });
        let mut last = element("plan", vec![]);
        last.attributes.push(Attribute {
            name: "id".into(),
            value: "3".into(),
        });
        let root = element(
            "root",
            vec![
                Node::Element(outer),
                Node::Text("noise".into()),
                Node::Element(element("other", vec![Node::Element(last)])),
            ],
        );

        let ids: Vec<&str> = root
            .descendants_named("plan")
            .iter()
            .filter_map(|e| e.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn descendants_named_is_case_sensitive() {
        let root = element("root", vec![Node::Element(element("Plan", vec![]))]);
        assert!(root.descendants_named("plan").is_empty());
    }

    #[test]
    fn child_elements_skips_text_and_comments() {
        let root = element(
            "root",
            vec![
                Node::Text(" ".into()),
                Node::Comment("note".into()),
                Node::Element(Element::new("a")),
            ],
        );
        let names: Vec<&str> = root.child_elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
    }
}
