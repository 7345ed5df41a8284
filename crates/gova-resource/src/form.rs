//! Create-form sessions
//!
//! A [`CreateForm`] instantiates a resource's fields once and keeps those
//! instances for as long as the form is open, so edits survive re-renders.

use crate::error::ResourceError;
use crate::field::{Field, Properties};
use crate::label::Label;
use crate::resource::Resource;

/// Field instances of one open create form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateForm {
    label: Label,
    fields: Vec<Field>,
}

impl CreateForm {
    /// Open a blank form for `resource`
    #[must_use]
    pub fn new(resource: &Resource) -> Self {
        Self {
            label: resource.label().clone(),
            fields: resource.fields().iter().map(|f| f.instantiate()).collect(),
        }
    }

    /// Label of the resource being created
    #[inline]
    #[must_use]
    pub fn resource_label(&self) -> &Label {
        &self.label
    }

    /// Field instances, in display order
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field instance by attribute
    #[must_use]
    pub fn field(&self, attribute: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.attribute() == attribute)
    }

    /// Set the text of one field
    ///
    /// # Errors
    /// Returns [`ResourceError::UnknownField`] if the resource has no such attribute
    pub fn set(&mut self, attribute: &str, text: impl Into<String>) -> Result<(), ResourceError> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.attribute() == attribute)
            .ok_or_else(|| ResourceError::unknown_field(self.label.as_str(), attribute))?;
        field.set_text(text);
        Ok(())
    }

    /// Property mapping for a create request, one entry per field
    #[must_use]
    pub fn properties(&self) -> Properties {
        self.fields
            .iter()
            .map(|f| (f.attribute().to_string(), f.property_value()))
            .collect()
    }

    /// Blank every field
    pub fn clear(&mut self) {
        self.fields.iter_mut().for_each(Field::clear);
    }

    /// Check if every field is blank
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.value().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDef;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn new_form_is_blank_and_ordered() {
        let form = CreateForm::new(&Resource::user());
        assert!(form.is_blank());
        assert_eq!(form.resource_label().as_str(), "User");

        let attrs: Vec<_> = form.fields().iter().map(Field::attribute).collect();
        assert_eq!(attrs, vec!["name", "email"]);
    }

    #[test]
    fn edits_persist_on_the_same_instances() {
        let mut form = CreateForm::new(&Resource::user());
        form.set("name", "Ada").unwrap();

        // reading the fields again (a re-render) sees the edit
        assert_eq!(form.field("name").map(Field::value), Some("Ada"));
        assert_eq!(form.fields()[0].value(), "Ada");
    }

    #[test]
    fn set_unknown_attribute_fails() {
        let mut form = CreateForm::new(&Resource::user());
        let err = form.set("age", "36").unwrap_err();
        assert_eq!(err, ResourceError::unknown_field("User", "age"));
    }

    #[test]
    fn properties_cover_every_field() {
        let mut form = CreateForm::new(&Resource::user());
        form.set("name", "Ada").unwrap();
        form.set("email", "a@x.com").unwrap();

        let props = form.properties();
        assert_eq!(props.len(), 2);
        assert_eq!(props["name"], json!("Ada"));
        assert_eq!(props["email"], json!("a@x.com"));
    }

    #[test]
    fn blank_fields_are_still_submitted() {
        let form = CreateForm::new(&Resource::user());
        let props = form.properties();
        assert_eq!(props["name"], json!(""));
        assert_eq!(props["email"], json!(""));
    }

    #[test]
    fn number_fields_convert_in_properties() {
        let resource = Resource::new(
            Label::new("Book").unwrap(),
            vec![FieldDef::text("Title", "title"), FieldDef::number("Pages", "pages")],
        )
        .unwrap();
        let mut form = CreateForm::new(&resource);
        form.set("pages", "320").unwrap();

        assert_eq!(form.properties()["pages"], json!(320));
    }

    #[test]
    fn clear_blanks_all_fields() {
        let mut form = CreateForm::new(&Resource::user());
        form.set("name", "Ada").unwrap();
        form.clear();
        assert!(form.is_blank());
    }
}
