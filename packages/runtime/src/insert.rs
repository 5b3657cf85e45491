use crate::renderer::Renderer;
use crate::resolver::DeclarationMap;

/// Inject every declaration of `declarations` into `renderer` and return their
/// class names, space-joined, in map order.
///
/// Declarations already issued by the renderer are not inserted again. With
/// `rtl` set, declarations that flip use their `r`-prefixed variant.
pub fn insert_styles(declarations: &DeclarationMap, rtl: bool, renderer: &Renderer) -> String {
    let mut class_names = Vec::with_capacity(declarations.len());

    for (key, declaration) in declarations {
        let (class_name, css) = declaration.for_direction(rtl);
        renderer.insert(&class_name, key, declaration, css);
        class_names.push(class_name);
    }

    class_names.join(" ")
}
