//! Declarative model definitions.

/// Declare a typed model.
///
/// Every field becomes `pub name: Option<T>` and is described by a
/// [`Field`](crate::Field) expression. The table name defaults to the struct
/// name and can be overridden with `in "table"`.
///
/// ```rust
/// use quarry_query::{Field, Model, model};
///
/// model! {
///     /// A registered user.
///     pub struct User in "users" {
///         id: i64 = Field::integer().primary_key(),
///         name: String = Field::string().ddl("varchar(50)"),
///         admin: bool = Field::boolean(),
///     }
/// }
///
/// let schema = User::schema();
/// assert_eq!(schema.table(), "users");
/// assert_eq!(schema.select_sql(), "select `id`, `name`, `admin` from `users`");
/// ```
///
/// The schema is built on first use. An invalid definition (no primary key,
/// two primary keys, a duplicate column) panics at that point.
#[macro_export]
macro_rules! model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(in $table:literal)? {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ty:ty = $desc:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                pub $field: ::core::option::Option<$ty>,
            )+
        }

        impl $crate::Model for $name {
            fn schema() -> ::std::sync::Arc<$crate::ModelSchema> {
                static SCHEMA: ::std::sync::OnceLock<::std::sync::Arc<$crate::ModelSchema>> =
                    ::std::sync::OnceLock::new();
                SCHEMA
                    .get_or_init(|| {
                        let builder = $crate::ModelSchema::builder(stringify!($name));
                        $( let builder = builder.table($table); )?
                        $( let builder = builder.field(stringify!($field), $desc); )+
                        match builder.build() {
                            Ok(schema) => ::std::sync::Arc::new(schema),
                            Err(err) => panic!("invalid model `{}`: {}", stringify!($name), err),
                        }
                    })
                    .clone()
            }

            fn to_record(&self) -> $crate::Record {
                let mut record = $crate::Record::new(<Self as $crate::Model>::schema());
                $(
                    if let ::core::option::Option::Some(value) = &self.$field {
                        record.set(stringify!($field), ::core::clone::Clone::clone(value));
                    }
                )+
                record
            }

            fn from_record(record: &$crate::Record) -> $crate::OrmResult<Self> {
                ::core::result::Result::Ok(Self {
                    $( $field: record.get_as::<$ty>(stringify!($field))?, )+
                })
            }
        }
    };
}
