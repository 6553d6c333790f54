//! Custom Tera filters available to every template.

use std::collections::HashMap;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase};
use tera::{Result, Tera, Value};

/// Register all helper filters on `tera`
pub fn register(tera: &mut Tera) {
    tera.register_filter("snake_case", snake_case);
    tera.register_filter("camel_case", camel_case);
    tera.register_filter("pascal_case", pascal_case);
    tera.register_filter("kebab_case", kebab_case);
    tera.register_filter("receiver", receiver);
}

fn expect_str<'a>(value: &'a Value, filter: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{filter} filter expects a string")))
}

pub(crate) fn snake_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(expect_str(value, "snake_case")?.to_snake_case()))
}

pub(crate) fn camel_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(expect_str(value, "camel_case")?.to_lower_camel_case()))
}

pub(crate) fn pascal_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(expect_str(value, "pascal_case")?.to_pascal_case()))
}

pub(crate) fn kebab_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(expect_str(value, "kebab_case")?.to_kebab_case()))
}

/// Conventional Go receiver name: the lower-cased first letter of the type
pub(crate) fn receiver(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let name = expect_str(value, "receiver")?;
    let first = name
        .chars()
        .find(|c| c.is_alphabetic())
        .ok_or_else(|| tera::Error::msg(format!("cannot derive a receiver name from '{name}'")))?;
    Ok(Value::String(first.to_lowercase().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(filter: fn(&Value, &HashMap<String, Value>) -> Result<Value>, input: &str) -> String {
        let val = Value::String(input.to_string());
        let args = HashMap::new();
        filter(&val, &args).unwrap().as_str().unwrap().to_string()
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(apply(snake_case, "UserAccount"), "user_account");
        assert_eq!(apply(snake_case, "HTTPServer"), "http_server");
    }

    #[test]
    fn test_camel_and_pascal_case() {
        assert_eq!(apply(camel_case, "user_account"), "userAccount");
        assert_eq!(apply(pascal_case, "user_account"), "UserAccount");
        assert_eq!(apply(kebab_case, "UserAccount"), "user-account");
    }

    #[test]
    fn test_receiver() {
        assert_eq!(apply(receiver, "User"), "u");
        assert_eq!(apply(receiver, "*Order"), "o");
    }

    #[test]
    fn test_receiver_rejects_non_strings() {
        let result = receiver(&Value::Bool(true), &HashMap::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_filters_are_usable_from_templates() {
        let mut tera = Tera::default();
        register(&mut tera);
        tera.add_raw_template("t", "{{ Name | receiver }} {{ Name | snake_case }}")
            .unwrap();
        let mut context = tera::Context::new();
        context.insert("Name", "OrderLine");
        assert_eq!(tera.render("t", &context).unwrap(), "o order_line");
    }
}
