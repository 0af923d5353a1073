use fx_core::{ColorResolver, Rgba};
use web_sys as web;

/// Resolves `var(--token)` color references through the element's computed
/// style; literal strings parse directly. Re-created on resize so theme
/// changes between frames are picked up the next time the grid rebuilds.
pub struct ComputedStyleResolver {
    element: web::Element,
}

impl ComputedStyleResolver {
    pub fn new(element: web::Element) -> Self {
        Self { element }
    }
}

impl ColorResolver for ComputedStyleResolver {
    fn resolve(&self, token: &str) -> Option<Rgba> {
        let token = token.trim();
        let literal = match token
            .strip_prefix("var(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Some(var_name) => {
                let window = web::window()?;
                let style = window.get_computed_style(&self.element).ok()??;
                let value = style.get_property_value(var_name.trim()).ok()?;
                let value = value.trim().to_string();
                if value.is_empty() {
                    return None;
                }
                value
            }
            None => token.to_string(),
        };
        Rgba::parse(&literal).ok()
    }
}
