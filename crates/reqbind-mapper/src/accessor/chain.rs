use super::{CallbackAccessor, DataAccessor, PropertyPathAccessor};
use crate::error::AccessError;
use crate::field::Field;
use crate::Result;
use reqbind_value::{PropertyAccessor, Value};
use std::rc::Rc;
use tracing::trace;

/// Delegates to the first member able to handle the field.
///
/// Members are tried in declaration order, for reads as well as writes.
#[derive(Clone)]
pub struct ChainAccessor {
    accessors: Vec<Rc<dyn DataAccessor>>,
}

impl ChainAccessor {
    pub fn new(accessors: Vec<Rc<dyn DataAccessor>>) -> Self {
        Self { accessors }
    }

    /// Callback accessor first, then property paths resolved by
    /// `property_accessor`
    pub fn with_property_accessor(property_accessor: Rc<dyn PropertyAccessor>) -> Self {
        Self::new(vec![
            Rc::new(CallbackAccessor::new()),
            Rc::new(PropertyPathAccessor::new(property_accessor)),
        ])
    }

    fn readable_member(&self, data: &Value, field: &Field) -> Option<(usize, &dyn DataAccessor)> {
        self.accessors
            .iter()
            .enumerate()
            .find(|(_, accessor)| accessor.is_readable(data, field))
            .map(|(index, accessor)| (index, accessor.as_ref()))
    }

    fn writable_member(&self, data: &Value, field: &Field) -> Option<(usize, &dyn DataAccessor)> {
        self.accessors
            .iter()
            .enumerate()
            .find(|(_, accessor)| accessor.is_writable(data, field))
            .map(|(index, accessor)| (index, accessor.as_ref()))
    }
}

impl Default for ChainAccessor {
    fn default() -> Self {
        Self::new(vec![
            Rc::new(CallbackAccessor::new()),
            Rc::new(PropertyPathAccessor::default()),
        ])
    }
}

impl DataAccessor for ChainAccessor {
    fn get_value(&self, data: &Value, field: &Field) -> Result<Value> {
        let (index, accessor) = self
            .readable_member(data, field)
            .ok_or(AccessError::NoReadableAccessor)?;
        trace!(field = field.name(), member = index, "Chain member reads field");
        accessor.get_value(data, field)
    }

    fn set_value(&self, data: &mut Value, value: Value, field: &Field) -> Result<()> {
        let (index, accessor) = self
            .writable_member(data, field)
            .ok_or(AccessError::NoWritableAccessor)?;
        trace!(field = field.name(), member = index, "Chain member writes field");
        accessor.set_value(data, value, field)
    }

    fn is_readable(&self, data: &Value, field: &Field) -> bool {
        self.readable_member(data, field).is_some()
    }

    fn is_writable(&self, data: &Value, field: &Field) -> bool {
        self.writable_member(data, field).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::cell::RefCell;

    /// Records which calls reach it
    struct StubAccessor {
        name: &'static str,
        readable: bool,
        writable: bool,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl StubAccessor {
        fn new(
            name: &'static str,
            readable: bool,
            writable: bool,
            log: &Rc<RefCell<Vec<String>>>,
        ) -> Rc<dyn DataAccessor> {
            Rc::new(Self {
                name,
                readable,
                writable,
                log: log.clone(),
            })
        }
    }

    impl DataAccessor for StubAccessor {
        fn get_value(&self, _data: &Value, _field: &Field) -> Result<Value> {
            self.log.borrow_mut().push(format!("{}:get", self.name));
            Ok(Value::from(self.name))
        }

        fn set_value(&self, _data: &mut Value, _value: Value, _field: &Field) -> Result<()> {
            self.log.borrow_mut().push(format!("{}:set", self.name));
            Ok(())
        }

        fn is_readable(&self, _data: &Value, _field: &Field) -> bool {
            self.log.borrow_mut().push(format!("{}:readable", self.name));
            self.readable
        }

        fn is_writable(&self, _data: &Value, _field: &Field) -> bool {
            self.log.borrow_mut().push(format!("{}:writable", self.name));
            self.writable
        }
    }

    #[test]
    fn test_first_capable_member_wins() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let chain = ChainAccessor::new(vec![
            StubAccessor::new("first", false, false, &log),
            StubAccessor::new("second", true, true, &log),
            StubAccessor::new("third", true, true, &log),
        ]);
        let field = Field::new("a");
        let mut data = Value::Null;

        assert_eq!(chain.get_value(&data, &field).unwrap(), Value::from("second"));
        chain.set_value(&mut data, Value::Null, &field).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "first:readable",
                "second:readable",
                "second:get",
                "first:writable",
                "second:writable",
                "second:set",
            ]
        );
    }

    #[test]
    fn test_no_capable_member() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let chain = ChainAccessor::new(vec![StubAccessor::new("only", false, false, &log)]);
        let field = Field::new("a");
        let mut data = Value::Null;

        assert!(!chain.is_readable(&data, &field));
        assert!(!chain.is_writable(&data, &field));

        let err = chain.get_value(&data, &field).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to read from the given form data as no accessor in the chain is able to read the data."
        );
        let err = chain.set_value(&mut data, Value::Null, &field).unwrap_err();
        assert!(matches!(err, Error::Access(AccessError::NoWritableAccessor)));
    }

    #[test]
    fn test_default_chain_prefers_callbacks() {
        let chain = ChainAccessor::default();
        let data = Value::from(reqbind_value::Object::new("Foo").with_property("a", "structural"));

        let plain = Field::new("a");
        assert_eq!(chain.get_value(&data, &plain).unwrap(), Value::from("structural"));

        let with_getter = Field::new("a").with_getter(|_, _| Ok(Value::from("callback")));
        assert_eq!(chain.get_value(&data, &with_getter).unwrap(), Value::from("callback"));
    }
}
