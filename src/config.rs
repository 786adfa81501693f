//! Parameter loading from the environment and, with the `config` feature,
//! from JSON documents.
//!
//! Loaded parameters become literal definitions, so they can be aliased,
//! extended and read with `get` like any other service.

use std::env;

use crate::container::Container;
use crate::error::{DiError, DiResult, FrozenAction};

/// Maps `PREFIX_SECTION__KEY` to `section.key`.
///
/// Returns `None` when `key` does not start with `prefix` or nothing
/// remains after it.
pub fn env_key_to_id(prefix: &str, key: &str) -> Option<String> {
    let rest = key.strip_prefix(prefix)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.to_lowercase().replace("__", "."))
}

impl Container {
    /// Defines a `String` parameter for every environment variable that
    /// starts with `prefix`.
    ///
    /// See [`env_key_to_id`] for the id mapping. Variables whose value is
    /// not valid unicode are skipped.
    ///
    /// # Errors
    ///
    /// [`DiError::Frozen`] once the container is frozen.
    pub fn load_env(&self, prefix: &str) -> DiResult<&Self> {
        self.load_vars(prefix, env::vars_os().filter_map(|(k, v)| {
            Some((k.into_string().ok()?, v.into_string().ok()?))
        }))
    }

    /// Same as [`load_env`](Container::load_env) over an explicit list of
    /// variables.
    ///
    /// ```rust
    /// use ferrous_locator::Container;
    ///
    /// let container = Container::new();
    /// container.load_vars("APP_", vec![
    ///     ("APP_DATABASE__URL".to_string(), "postgres://db".to_string()),
    ///     ("HOME".to_string(), "/root".to_string()),
    /// ])?;
    ///
    /// assert_eq!(*container.get::<String>("database.url")?, "postgres://db");
    /// assert!(!container.has("home"));
    /// # Ok::<(), ferrous_locator::DiError>(())
    /// ```
    pub fn load_vars<I>(&self, prefix: &str, vars: I) -> DiResult<&Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let params: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| env_key_to_id(prefix, &key).map(|id| (id, value)))
            .collect();

        self.set_all(params, |id, value| {
            self.set_value(id, value)?;
            Ok(())
        })
    }

    /// Checks the frozen flag once, then stores every parameter, so a
    /// frozen container rejects the whole batch before defining anything.
    /// An empty batch is a no-op.
    fn set_all<V>(
        &self,
        params: Vec<(String, V)>,
        mut define: impl FnMut(String, V) -> DiResult<()>,
    ) -> DiResult<&Self> {
        if let (true, Some((id, _))) = (self.is_frozen(), params.first()) {
            return Err(DiError::Frozen(FrozenAction::Define(id.clone())));
        }
        for (id, value) in params {
            define(id, value)?;
        }
        Ok(self)
    }
}

#[cfg(feature = "config")]
mod json {
    use serde::de::DeserializeOwned;
    use serde_json::Value;

    use crate::container::Container;
    use crate::definition::Definition;
    use crate::error::{DiError, DiResult};

    impl Container {
        /// Defines one parameter per leaf of a JSON object.
        ///
        /// Nested objects are flattened with `.`-joined ids. Strings become
        /// `String`, booleans `bool`, integers `i64`, other numbers `f64`;
        /// arrays and nulls are stored as `serde_json::Value`.
        ///
        /// # Errors
        ///
        /// [`DiError::Config`] if `document` is not an object,
        /// [`DiError::Frozen`] once the container is frozen.
        pub fn load_json(&self, document: &Value) -> DiResult<&Self> {
            let root = document
                .as_object()
                .ok_or_else(|| DiError::Config("the JSON root must be an object".to_string()))?;

            let mut params = Vec::new();
            flatten("", root, &mut params);
            self.set_all(params, |id, definition| {
                self.set(id, definition)?;
                Ok(())
            })
        }

        /// Parses `source` and loads it with [`load_json`](Container::load_json).
        pub fn load_json_str(&self, source: &str) -> DiResult<&Self> {
            let document: Value =
                serde_json::from_str(source).map_err(|e| DiError::Config(e.to_string()))?;
            self.load_json(&document)
        }

        /// Deserializes `source` into a `T` and defines it as a literal.
        ///
        /// ```rust
        /// use ferrous_locator::Container;
        /// use serde::Deserialize;
        ///
        /// #[derive(Deserialize)]
        /// struct Smtp { host: String, port: u16 }
        ///
        /// let container = Container::new();
        /// container.set_json::<Smtp>("smtp", r#"{"host": "mail", "port": 25}"#)?;
        /// assert_eq!(container.get::<Smtp>("smtp")?.port, 25);
        /// # Ok::<(), ferrous_locator::DiError>(())
        /// ```
        pub fn set_json<T>(&self, id: impl Into<String>, source: &str) -> DiResult<&Self>
        where
            T: DeserializeOwned + Send + Sync + 'static,
        {
            let value: T =
                serde_json::from_str(source).map_err(|e| DiError::Config(e.to_string()))?;
            self.set_value(id, value)
        }
    }

    fn flatten(
        prefix: &str,
        object: &serde_json::Map<String, Value>,
        out: &mut Vec<(String, Definition)>,
    ) {
        for (key, value) in object {
            let id = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };

            match value {
                Value::Object(nested) => flatten(&id, nested, out),
                Value::String(s) => out.push((id, Definition::value(s.clone()))),
                Value::Bool(b) => out.push((id, Definition::value(*b))),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => out.push((id, Definition::value(i))),
                    None => out.push((id, Definition::value(n.as_f64().unwrap_or(f64::NAN)))),
                },
                Value::Array(_) | Value::Null => out.push((id, Definition::value(value.clone()))),
            }
        }
    }
}
