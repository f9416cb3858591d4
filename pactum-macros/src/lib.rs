//! Procedural macros for Pactum.
//!
//! These are re-exported from the `pactum` crate; depend on that instead.

mod utils;

use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Waits on several promises at once, fail-fast.
///
/// Each argument must be a `Promise<_, E>` place expression; the value types
/// may differ, the error type must be shared. Expands to a
/// `Result<(&V1, &V2, ...), &TaskError<E>>`: the first failure observed, or
/// every value once all promises succeeded. A single promise yields
/// `Result<&V, &TaskError<E>>`.
///
/// ```rust,ignore
/// let name = pactum::execute(ctx.clone(), id, load_name);
/// let avatar = pactum::execute(ctx.clone(), id, load_avatar);
///
/// let (name, avatar) = pactum::join!(name, avatar)?;
/// ```
#[proc_macro]
pub fn join(input: TokenStream) -> TokenStream {
    let args = utils::split_args(input);
    let count = args.len();

    if count == 0 {
        return utils::compile_error("join! requires at least one promise");
    }

    let mut output = String::from("{\n");

    for idx in 1..=count {
        output.push_str(&format!("let __p{idx} = &__ARG{idx};\n"));
    }

    if count == 1 {
        output.push_str("__p1.get()\n}");
        return substitute(&output, &args);
    }

    let completions = (1..=count)
        .map(|i| format!("::pactum::__private::as_completion(__p{i})"))
        .collect::<Vec<_>>()
        .join(", ");

    output.push_str(&format!("match ::pactum::wait([{completions}]) {{\n"));
    output.push_str("    ::core::result::Result::Err(__err) => ");
    output.push_str("::core::result::Result::Err(__err),\n");
    output.push_str("    ::core::result::Result::Ok(()) => {\n");

    let gets = (1..=count)
        .map(|i| format!("__p{i}.get()"))
        .collect::<Vec<_>>()
        .join(", ");
    output.push_str(&format!("        match ({gets}) {{\n"));

    // Every promise succeeded once `wait` returns `Ok`; the error arms only
    // make the match exhaustive without unwrapping.
    let oks = (1..=count)
        .map(|i| format!("::core::result::Result::Ok(__v{i})"))
        .collect::<Vec<_>>()
        .join(", ");
    let values = (1..=count)
        .map(|i| format!("__v{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    output.push_str(&format!(
        "            ({oks}) => ::core::result::Result::Ok(({values})),\n"
    ));

    for failed in 1..=count {
        let pattern = (1..=count)
            .map(|i| {
                if i == failed {
                    "::core::result::Result::Err(__err)".to_owned()
                } else {
                    "_".to_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        output.push_str(&format!(
            "            ({pattern}) => ::core::result::Result::Err(__err),\n"
        ));
    }

    output.push_str("        }\n    }\n}\n}");

    substitute(&output, &args)
}

/// Parses the generated skeleton and splices each argument in place of its
/// `__ARG{n}` placeholder, wrapped in parentheses.
///
/// Arguments are spliced as tokens rather than re-parsed from strings so
/// their spans, and with them error locations, are preserved.
fn substitute(skeleton: &str, args: &[Vec<TokenTree>]) -> TokenStream {
    match skeleton.parse::<TokenStream>() {
        Ok(stream) => splice(stream, args),
        Err(err) => utils::compile_error(&format!("join! macro error: {err}")),
    }
}

fn splice(stream: TokenStream, args: &[Vec<TokenTree>]) -> TokenStream {
    stream
        .into_iter()
        .map(|token| match token {
            TokenTree::Ident(ident) => {
                let name = ident.to_string();
                let arg = name
                    .strip_prefix("__ARG")
                    .and_then(|n| n.parse::<usize>().ok())
                    .and_then(|n| args.get(n.wrapping_sub(1)));

                match arg {
                    Some(arg) => TokenTree::Group(Group::new(
                        Delimiter::Parenthesis,
                        utils::to_stream(arg),
                    )),
                    None => TokenTree::Ident(ident),
                }
            }
            TokenTree::Group(group) => {
                let mut spliced = Group::new(group.delimiter(), splice(group.stream(), args));
                spliced.set_span(group.span());
                TokenTree::Group(spliced)
            }
            other => other,
        })
        .collect()
}
