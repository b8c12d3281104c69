use convert_case::{Case, Casing};
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{spanned::Spanned, *};

const DEFAULT_FIELD: &str = "type";

#[derive(Clone, Copy)]
enum RenameRule {
    Camel,
    Pascal,
    Snake,
    ScreamingSnake,
    Kebab,
    Lower,
    Upper,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> Result<Self> {
        Ok(match lit.value().as_str() {
            "camelCase" => Self::Camel,
            "PascalCase" => Self::Pascal,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            other => {
                return Err(Error::new_spanned(
                    lit,
                    format_args!("unsupported rename_all casing `{other}`"),
                ))
            }
        })
    }

    fn apply(self, ident: &str) -> String {
        match self {
            Self::Camel => ident.to_case(Case::Camel),
            Self::Pascal => ident.to_case(Case::Pascal),
            Self::Snake => ident.to_case(Case::Snake),
            Self::ScreamingSnake => ident.to_case(Case::UpperSnake),
            Self::Kebab => ident.to_case(Case::Kebab),
            Self::Lower => ident.to_lowercase(),
            Self::Upper => ident.to_uppercase(),
        }
    }
}

struct Container {
    field: String,
    rename_all: RenameRule,
}

impl Default for Container {
    fn default() -> Self {
        Container {
            field: DEFAULT_FIELD.to_string(),
            rename_all: RenameRule::Camel,
        }
    }
}

fn parse_container(attrs: &[Attribute]) -> Result<Container> {
    let mut container = Container::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("tagged")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("field") {
                container.field = meta.value()?.parse::<LitStr>()?.value();
                Ok(())
            } else if meta.path.is_ident("rename_all") {
                container.rename_all = RenameRule::parse(&meta.value()?.parse()?)?;
                Ok(())
            } else {
                Err(meta.error("expected `field` or `rename_all`"))
            }
        })?;
    }

    if container.field.is_empty() {
        return Err(Error::new(
            Span::call_site(),
            "the discriminator field name cannot be empty",
        ));
    }

    Ok(container)
}

fn parse_rename(attrs: &[Attribute]) -> Result<Option<LitStr>> {
    let mut rename = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("tagged")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                rename = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("expected `rename`"))
            }
        })?;
    }
    Ok(rename)
}

struct TaggedVariant {
    ident: Ident,
    tag: String,
    pat: TokenStream,
}

fn collect_variants(data: &DataEnum, container: &Container) -> Result<Vec<TaggedVariant>> {
    let mut out: Vec<TaggedVariant> = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        let tag = match parse_rename(&variant.attrs)? {
            Some(lit) => lit.value(),
            None => container.rename_all.apply(&variant.ident.to_string()),
        };

        if out.iter().any(|v| v.tag == tag) {
            return Err(Error::new_spanned(
                &variant.ident,
                format_args!("discriminator `{tag}` is used by more than one variant"),
            ));
        }

        let ident = &variant.ident;
        let pat = match &variant.fields {
            Fields::Named(_) => quote!(Self::#ident { .. }),
            Fields::Unnamed(_) => quote!(Self::#ident(..)),
            Fields::Unit => quote!(Self::#ident),
        };

        out.push(TaggedVariant {
            ident: variant.ident.clone(),
            tag,
            pat,
        });
    }
    Ok(out)
}

pub fn expand_tagged(input: DeriveInput) -> Result<TokenStream> {
    let data = match &input.data {
        Data::Enum(data) => data,
        Data::Struct(s) => {
            return Err(Error::new(
                s.struct_token.span(),
                "`Tagged` can only be derived for enums",
            ))
        }
        Data::Union(u) => {
            return Err(Error::new(
                u.union_token.span(),
                "`Tagged` can only be derived for enums",
            ))
        }
    };

    let container = parse_container(&input.attrs)?;
    let variants = collect_variants(data, &container)?;

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field = &container.field;
    let tags = variants.iter().map(|v| &v.tag);
    let arms = variants.iter().map(|TaggedVariant { tag, pat, .. }| {
        quote!(#pat => #tag,)
    });
    let predicates = variants.iter().map(|TaggedVariant { ident, tag, pat }| {
        let name = format_ident!("is_{}", ident.to_string().to_case(Case::Snake));
        let doc = format!("Whether this value is the `{tag}` variant.");
        quote! {
            #[doc = #doc]
            #[must_use]
            pub const fn #name(&self) -> bool {
                matches!(self, #pat)
            }
        }
    });

    // an uninhabited enum has no arm to produce a tag from
    let body = if variants.is_empty() {
        quote!(match *self {})
    } else {
        quote!(match self { #(#arms)* })
    };

    Ok(quote! {
        impl #impl_generics ::tagsum::Tagged for #ident #ty_generics #where_clause {
            fn tag(&self) -> &str {
                #body
            }
        }

        impl #impl_generics ::tagsum::Variants for #ident #ty_generics #where_clause {
            const FIELD: &'static str = #field;
            const TAGS: &'static [&'static str] = &[#(#tags),*];
        }

        impl #impl_generics #ident #ty_generics #where_clause {
            #(#predicates)*
        }
    })
}
