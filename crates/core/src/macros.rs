//! Declarative field tables.

/// Implement [`Describe`](crate::Describe), [`FieldAccess`](crate::FieldAccess)
/// and [`PropertySource`](crate::PropertySource) for a struct from a list of
/// its fields.
///
/// Each entry is `visibility name: Type` where visibility is one of `public`,
/// `protected` or `private`, and `Type` implements
/// [`PropertyValue`](crate::PropertyValue). Only `public` fields are readable
/// as an object source. [`PropertyTarget`](crate::PropertyTarget) is left to
/// the caller so it can provide a write hook.
///
/// ```ignore
/// #[derive(Default)]
/// struct Customer {
///     id: i64,
///     name: Option<String>,
///     note: Option<String>,
/// }
///
/// propfill_core::describe_properties!(Customer {
///     public id: i64,
///     public name: Option<String>,
///     private note: Option<String>,
/// });
///
/// impl propfill_core::PropertyTarget for Customer {}
/// ```
#[macro_export]
macro_rules! describe_properties {
    ($ty:ident { $($vis:ident $field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::Describe for $ty {
            fn type_name() -> &'static str {
                stringify!($ty)
            }

            fn describe() -> ::std::vec::Vec<$crate::FieldDescriptor> {
                ::std::vec![
                    $(
                        $crate::FieldDescriptor::of::<$fty>(
                            stringify!($field),
                            $crate::__visibility!($vis),
                        )
                    ),*
                ]
            }
        }

        impl $crate::FieldAccess for $ty {
            #[allow(unused_variables)]
            fn assign(&mut self, field: &str, value: $crate::Value) -> $crate::CopyResult<()> {
                match field {
                    $(
                        stringify!($field) => {
                            self.$field = <$fty as $crate::PropertyValue>::from_value(value)
                                .map_err(|reason| {
                                    $crate::CopyError::coercion(
                                        field,
                                        $crate::FieldDescriptor::primary_of::<$fty>(),
                                        reason,
                                    )
                                })?;
                            Ok(())
                        }
                    )*
                    _ => Err($crate::CopyError::unknown_field(stringify!($ty), field)),
                }
            }

            fn read(&self, field: &str) -> ::core::option::Option<$crate::Value> {
                match field {
                    $(
                        stringify!($field) => {
                            ::core::option::Option::Some($crate::PropertyValue::to_value(&self.$field))
                        }
                    )*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl $crate::PropertySource for $ty {
            fn read_property(&self, name: &str) -> ::core::option::Option<$crate::Value> {
                match name {
                    $(
                        stringify!($field)
                            if $crate::__visibility!($vis) == $crate::Visibility::Public =>
                        {
                            ::core::option::Option::Some($crate::PropertyValue::to_value(&self.$field))
                        }
                    )*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __visibility {
    (public) => {
        $crate::Visibility::Public
    };
    (protected) => {
        $crate::Visibility::Protected
    };
    (private) => {
        $crate::Visibility::Private
    };
}
