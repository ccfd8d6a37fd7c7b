//! End-to-end scenarios: a session registering image- and matrix-style
//! native APIs, called the way an embedding runtime would drive them.

use std::sync::atomic::{AtomicUsize, Ordering};

use scriptbind::{NativeFn, Opaque, OpaqueHandle, ScriptStack, Session, TypeTag, Value};

struct Image {
    width: i32,
    height: i32,
}

impl Opaque for Image {
    const TYPE_NAME: &'static str = "Image";
}

struct Matrix {
    dx: f64,
    dy: f64,
}

impl Opaque for Matrix {
    const TYPE_NAME: &'static str = "Matrix";
}

fn create_image(width: i32, height: i32) -> *mut Image {
    Box::into_raw(Box::new(Image { width, height }))
}

fn image_width(image: *mut Image) -> i32 {
    unsafe { (*image).width }
}

fn image_height(image: *mut Image) -> i32 {
    unsafe { (*image).height }
}

fn image_extents(image: *mut Image, x1: *mut f64, y1: *mut f64, x2: *mut f64, y2: *mut f64) {
    unsafe {
        *x1 = 0.0;
        *y1 = 0.0;
        *x2 = (*image).width as f64;
        *y2 = (*image).height as f64;
    }
}

fn image_origin(_image: *mut Image, x: *mut f64, y: *mut f64) -> i32 {
    unsafe {
        *x = 4.0;
        *y = 8.0;
    }
    0
}

fn destroy_image(image: *mut Image) {
    unsafe { drop(Box::from_raw(image)) }
}

fn translate_matrix(dx: f64, dy: f64) -> *mut Matrix {
    Box::into_raw(Box::new(Matrix { dx, dy }))
}

fn identity_matrix() -> *mut Matrix {
    translate_matrix(0.0, 0.0)
}

fn matrix_transform_point(matrix: *mut Matrix, x: *mut f64, y: *mut f64) {
    unsafe {
        *x += (*matrix).dx;
        *y += (*matrix).dy;
    }
}

fn swap_values(a: *mut f64, b: *mut f64) {
    unsafe { std::ptr::swap(a, b) };
}

/// A session with the image API registered under an "image" prototype.
fn image_session() -> Session {
    let mut session = Session::new();
    session
        .registry_mut()
        .create_prototype(Image::type_tag(), |methods| {
            methods.register("width", image_width);
            methods.register("height", image_height);
            methods.register_multi_return("getextents", image_extents);
            methods.register_multi_return("getorigin", image_origin);
        })
        .unwrap();
    session.globals_mut().register("create", create_image);
    session
}

fn handle_at(stack: &ScriptStack, position: i32) -> OpaqueHandle {
    let Some(Value::Handle(handle)) = stack.get(position) else {
        panic!("expected a handle at position {position}");
    };
    handle.clone()
}

fn call_method(
    session: &Session,
    handle: &OpaqueHandle,
    name: &str,
    stack: &mut ScriptStack,
) -> usize {
    let method: NativeFn = handle.method(name).unwrap().clone();
    method.call(stack, session.registry()).unwrap()
}

#[test]
fn constructor_returns_tagged_handle_with_methods() {
    let session = image_session();
    let mut stack = ScriptStack::new();
    stack.push(Value::Int(10));
    stack.push(Value::Int(20));

    let results = session.call("create", &mut stack).unwrap();
    assert_eq!(results, 1);

    let handle = handle_at(&stack, 1);
    assert_eq!(handle.type_tag(), Image::type_tag());
    assert_eq!(handle.type_name(), "Image");
    for name in ["width", "height", "getextents", "getorigin"] {
        assert!(handle.method(name).is_some(), "missing method {name}");
    }

    stack.clear();
    stack.push(Value::Handle(handle.clone()));
    let results = call_method(&session, &handle, "width", &mut stack);
    assert_eq!(results, 1);
    assert_eq!(stack.values(), &[Value::Int(10)]);

    destroy_image(handle.data().cast());
}

#[test]
fn pure_output_method_returns_four_numbers_in_order() {
    let session = image_session();
    let mut stack = ScriptStack::new();
    stack.push(Value::Int(640));
    stack.push(Value::Int(480));
    session.call("create", &mut stack).unwrap();
    let handle = handle_at(&stack, 1);

    stack.clear();
    stack.push(Value::Handle(handle.clone()));
    let results = call_method(&session, &handle, "getextents", &mut stack);
    assert_eq!(results, 4);
    assert_eq!(
        stack.values(),
        &[
            Value::Float(0.0),
            Value::Float(0.0),
            Value::Float(640.0),
            Value::Float(480.0),
        ]
    );

    destroy_image(handle.data().cast());
}

#[test]
fn pure_output_return_value_comes_first() {
    let session = image_session();
    let mut stack = ScriptStack::new();
    stack.push(Value::Int(1));
    stack.push(Value::Int(1));
    session.call("create", &mut stack).unwrap();
    let handle = handle_at(&stack, 1);

    stack.clear();
    stack.push(Value::Handle(handle.clone()));
    let results = call_method(&session, &handle, "getorigin", &mut stack);
    assert_eq!(results, 3);
    assert_eq!(
        stack.values(),
        &[Value::Int(0), Value::Float(4.0), Value::Float(8.0)]
    );

    destroy_image(handle.data().cast());
}

#[test]
fn input_output_swap_preserves_declared_order() {
    let mut session = Session::new();
    session.globals_mut().register_in_out("swap", swap_values);

    let mut stack = ScriptStack::new();
    stack.push(Value::Float(10.0));
    stack.push(Value::Float(20.0));
    let results = session.call("swap", &mut stack).unwrap();
    assert_eq!(results, 2);
    assert_eq!(stack.values(), &[Value::Float(20.0), Value::Float(10.0)]);
}

#[test]
fn input_output_method_with_handle_input() {
    let mut session = Session::new();
    let shared = TypeTag::from_name("matrix-methods");
    session
        .registry_mut()
        .create_prototype(shared, |methods| {
            methods.register_in_out("transformpoint", matrix_transform_point);
        })
        .unwrap();
    session
        .globals_mut()
        .register_with_prototype("matrix", translate_matrix, shared);
    session
        .globals_mut()
        .register_with_prototype("identitymatrix", identity_matrix, shared);

    let mut stack = ScriptStack::new();
    stack.push(Value::Float(5.0));
    stack.push(Value::Float(7.0));
    session.call("matrix", &mut stack).unwrap();
    let matrix = handle_at(&stack, 1);

    // The handle keeps its own family tag; the methods come from the shared
    // prototype both constructors point at.
    assert_eq!(matrix.type_tag(), Matrix::type_tag());
    assert!(matrix.method("transformpoint").is_some());

    stack.clear();
    stack.push(Value::Handle(matrix.clone()));
    stack.push(Value::Float(1.0));
    stack.push(Value::Float(2.0));
    let results = call_method(&session, &matrix, "transformpoint", &mut stack);
    assert_eq!(results, 2);
    assert_eq!(stack.values(), &[Value::Float(6.0), Value::Float(9.0)]);

    stack.clear();
    session.call("identitymatrix", &mut stack).unwrap();
    let identity = handle_at(&stack, 1);
    assert!(identity.method("transformpoint").is_some());

    unsafe {
        drop(Box::from_raw(matrix.data().cast::<Matrix>()));
        drop(Box::from_raw(identity.data().cast::<Matrix>()));
    }
}

#[test]
fn argument_mismatch_aborts_before_native_call() {
    let session = image_session();
    let mut stack = ScriptStack::new();
    stack.push(Value::Int(10));
    stack.push(Value::String("twenty".into()));

    let err = session.call("create", &mut stack).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parameter 2 must be of type \"i32\", but it is a \"string\"."
    );
}

#[test]
fn handle_of_wrong_family_is_rejected() {
    let mut session = image_session();
    session
        .registry_mut()
        .create_prototype(Matrix::type_tag(), |_| {})
        .unwrap();
    session
        .globals_mut()
        .register("width", image_width);
    session.globals_mut().register("matrix", translate_matrix);

    let mut stack = ScriptStack::new();
    stack.push(Value::Float(0.0));
    stack.push(Value::Float(0.0));
    session.call("matrix", &mut stack).unwrap();
    let matrix = handle_at(&stack, 1);

    stack.clear();
    stack.push(Value::Handle(matrix.clone()));
    let err = session.call("width", &mut stack).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parameter 1 must be of type \"Image\", but it was a \"Matrix\"."
    );

    unsafe { drop(Box::from_raw(matrix.data().cast::<Matrix>())) };
}

#[test]
fn enums_install_and_collide_deterministically() {
    let mut session = Session::new();
    session
        .globals_mut()
        .register_enum("format", &[("ARGB32", 0), ("RGB24", 1), ("A8", 2)])
        .unwrap();
    assert!(
        session
            .globals_mut()
            .register_enum("format", &[("A1", 3)])
            .is_err()
    );
    session
        .globals_mut()
        .register_enum("linecap", &[("BUTT", 0), ("ROUND", 1), ("SQUARE", 2)])
        .unwrap();

    let format = session.globals().enumeration("format").unwrap();
    assert_eq!(format.get("RGB24"), Some(1));
    assert_eq!(format.len(), 3);
    assert_eq!(
        session.globals().enumeration("linecap").unwrap().get("SQUARE"),
        Some(2)
    );
}

static DESTROYED: AtomicUsize = AtomicUsize::new(0);

fn counting_destroy(image: *mut Image) {
    DESTROYED.fetch_add(1, Ordering::Relaxed);
    destroy_image(image);
}

#[test]
fn finalizer_runs_once_when_the_runtime_value_dies() {
    let mut session = Session::new();
    session
        .registry_mut()
        .create_prototype(Image::type_tag(), |_| {})
        .unwrap();
    session
        .registry_mut()
        .attach_finalizer_for(counting_destroy)
        .unwrap();
    session.globals_mut().register("create", create_image);

    let mut stack = ScriptStack::new();
    stack.push(Value::Int(2));
    stack.push(Value::Int(2));
    session.call("create", &mut stack).unwrap();

    let value = stack.pop().unwrap();
    let copy = value.clone();
    assert_eq!(DESTROYED.load(Ordering::Relaxed), 0);
    drop(value);
    assert_eq!(DESTROYED.load(Ordering::Relaxed), 0);
    drop(copy);
    assert_eq!(DESTROYED.load(Ordering::Relaxed), 1);
}

#[test]
fn retained_getter_acquires_a_reference() {
    static ACQUIRED: AtomicUsize = AtomicUsize::new(0);

    fn get_backing(image: *mut Image) -> *mut Image {
        image
    }
    fn add_ref(image: *mut Image) -> *mut Image {
        ACQUIRED.fetch_add(1, Ordering::Relaxed);
        image
    }

    let mut session = image_session();
    session
        .globals_mut()
        .register_with_prototype(
            "getbacking",
            scriptbind::retained(get_backing, add_ref),
            Image::type_tag(),
        );

    let mut stack = ScriptStack::new();
    stack.push(Value::Int(3));
    stack.push(Value::Int(3));
    session.call("create", &mut stack).unwrap();
    let image = handle_at(&stack, 1);

    stack.clear();
    stack.push(Value::Handle(image.clone()));
    let results = session.call("getbacking", &mut stack).unwrap();
    assert_eq!(results, 1);
    assert_eq!(ACQUIRED.load(Ordering::Relaxed), 1);
    assert_eq!(handle_at(&stack, 1), image);

    destroy_image(image.data().cast());
}

#[test]
fn finalizer_attach_requires_existing_prototype() {
    let mut session = Session::new();
    assert!(
        session
            .registry_mut()
            .attach_finalizer_for(destroy_image)
            .is_err()
    );
}
