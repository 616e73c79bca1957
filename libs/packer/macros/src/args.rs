use darling::ast::Data;
use darling::util::{Flag, Ignored};
use syn::{Generics, Ident, Path, Type, Visibility};

#[derive(Debug, darling::FromField)]
#[darling(attributes(pack))]
pub struct FieldArgs {
    pub ident: Option<Ident>,
    pub vis: Visibility,
    pub ty: Type,
    pub skip: Flag,
    pub flatten: Flag,
}

#[derive(Debug, darling::FromDeriveInput)]
#[darling(attributes(pack), supports(struct_any))]
pub struct PackArgs {
    pub ident: Ident,
    pub generics: Generics,
    pub data: Data<Ignored, FieldArgs>,
    #[darling(rename = "crate")]
    pub crate_: Option<Path>,
}

impl FieldArgs {
    /// Whether this field ends up in the encoded output.
    pub fn is_packed(&self) -> bool {
        if self.skip.is_present() {
            return false;
        }

        // embedded records are promoted no matter their own visibility
        self.flatten.is_present() || matches!(self.vis, Visibility::Public(_))
    }
}
