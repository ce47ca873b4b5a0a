// Document model: the layout region and the element trees hung off it

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Replace everything inside this element.
    pub fn replace_children(&mut self, children: Vec<Element>) {
        self.text = None;
        self.children = children;
    }

    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    pub fn render_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(id) = &self.id {
            out.push_str(&format!(" id=\"{}\"", escape(id)));
        }
        if !self.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape(&self.classes.join(" "))));
        }
        for (key, value) in &self.attrs {
            out.push_str(&format!(" {}=\"{}\"", key, escape(value)));
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// The layout region. Containers are top-level children keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Document {
    region: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a container. Returns true once the container is confirmed
    /// to be part of the region; containers without an id, or with an id
    /// that is already attached, are refused.
    pub fn append(&mut self, container: Element) -> bool {
        let Some(id) = container.id.clone() else {
            return false;
        };
        if self.contains(&id) {
            return false;
        }
        self.region.push(container);
        self.contains(&id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.region.iter().any(|c| c.id.as_deref() == Some(id))
    }

    pub fn container_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.region.iter_mut().find(|c| c.id.as_deref() == Some(id))
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        let idx = self.region.iter().position(|c| c.id.as_deref() == Some(id))?;
        Some(self.region.remove(idx))
    }

    pub fn render_html(&self) -> String {
        let mut out = String::from("<div class=\"row\">");
        for container in &self.region {
            out.push_str(&container.render_html());
        }
        out.push_str("</div>");
        out
    }
}

#[cfg(test)]
impl Document {
    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    pub fn container_ids(&self) -> Vec<&str> {
        self.region.iter().filter_map(|c| c.id.as_deref()).collect()
    }
}
