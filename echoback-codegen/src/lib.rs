use proc_macro::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::spanned::Spanned;

/// Turns `fn name(server: &EchoServer)` into a `#[test]` that owns an echo
/// server for its whole run.
///
/// The attribute argument is the canned response body, any expression
/// accepted by `EchoServer::start`. The server is closed on every exit path,
/// and a panicking body still releases the listener before the panic resumes.
///
/// ```ignore
/// #[echo_test(r#"{"localId":"uid"}"#)]
/// fn deletes_a_user(server: &EchoServer) {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn echo_test(attrs: TokenStream, item: TokenStream) -> TokenStream {
    if attrs.is_empty() {
        return quote! {
            compile_error!("A canned response body should be passed to the macro");
        }
        .into();
    }

    let response = syn::parse_macro_input!(attrs as syn::Expr);
    let input = syn::parse_macro_input!(item as syn::ItemFn);

    if let Err(stream) = validate_signature(&input.sig) {
        return stream.into();
    }

    let attributes = &input.attrs;
    let visibility = &input.vis;
    let name = &input.sig.ident;

    let mut body_function = input.clone();
    body_function.attrs.clear();
    body_function.sig.ident = format_ident!("__echo_test_{}", name);
    let body_name = &body_function.sig.ident;

    let output = quote! {
        #[test]
        #(#attributes)*
        #visibility fn #name() {
            #body_function

            ::echoback::init_test_tracing();
            let __echo_server = match ::echoback::EchoServer::start(#response) {
                Ok(server) => server,
                Err(e) => panic!("Echo server error: {}", e),
            };

            let __echo_outcome = ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| {
                #body_name(&__echo_server)
            }));
            let __echo_closed = __echo_server.close();

            if let Err(e) = __echo_outcome {
                ::std::panic::resume_unwind(e);
            }
            if let Err(e) = __echo_closed {
                panic!("Echo server error: {}", e);
            }
        }
    };

    TokenStream::from(output)
}

fn validate_signature(signature: &syn::Signature) -> Result<(), proc_macro2::TokenStream> {
    if signature.inputs.len() != 1 {
        return Err(quote_spanned! {signature.inputs.span()=>
            compile_error!("The test function should take exactly one `&EchoServer` argument!");
        });
    }

    if signature.asyncness.is_some() {
        return Err(quote_spanned! {signature.span()=>
            compile_error!("The test function shouldn't be async!");
        });
    }

    Ok(())
}
