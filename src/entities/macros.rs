//! Macros for reducing boilerplate when defining records

/// Implement [`Entity`](crate::core::entity::Entity) for a record struct
///
/// The struct must carry `id: Uuid`, `created_at` and `updated_at`
/// (`DateTime<Utc>`). Each entry under `fields` maps a field name to a
/// non-capturing closure returning its string form; those names are what
/// `find_by` and the uniqueness checks look up.
///
/// # Example
/// ```rust,ignore
/// impl_entity!(Volunteer, "volunteer", "volunteers",
///     unique: ["email"],
///     fields: {
///         "email" => |v| Some(v.email.clone()),
///         "status" => |v| variant_name(&v.status),
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_entity {
    (
        $type:ident, $singular:literal, $plural:literal,
        unique: [$($unique:literal),* $(,)?],
        fields: { $($field:literal => $getter:expr),* $(,)? } $(,)?
    ) => {
        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            fn touch(&mut self) {
                self.updated_at = ::chrono::Utc::now();
            }

            fn unique_fields() -> &'static [&'static str] {
                &[$($unique),*]
            }

            fn field_value(&self, field: &str) -> Option<String> {
                match field {
                    $(
                        $field => {
                            let getter: fn(&Self) -> Option<String> = $getter;
                            getter(self)
                        }
                    )*
                    _ => None,
                }
            }
        }
    };
}
