//! A driver simulated in memory.
//!
//! `HeadlessVisitor` keeps the objects and bindings a real driver would keep, and
//! raises the same error codes on misuse, so everything above the backend could
//! run and be tested without a window. Shaders are not really compiled: a stage
//! compiles if it declares `main` and its braces and parentheses balance. Uniform
//! locations are assigned to `uniform` declarations in declaration order.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

use super::super::buffer::{BufferHint, BufferTarget};
use super::super::device::Bindings;
use super::super::shader::{ShaderStage, UniformVariable};
use super::super::vertex_array::VertexElement;
use super::Visitor;
use crate::utils::color::Color;

/// The number of vertex attributes of every vertex array.
pub const MAX_VERTEX_ATTRIBUTES: u32 = 16;

/// A recorded draw call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub program: u32,
    pub vertex_array: u32,
    pub element_buffer: u32,
    pub count: u32,
}

/// A vertex attribute of a vertex array.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub enabled: bool,
    /// The element, stride, offset and source buffer, once a pointer was specified.
    pub pointer: Option<(VertexElement, u32, usize, u32)>,
}

#[derive(Debug, Default)]
struct VertexArrayState {
    element_buffer: u32,
    attributes: BTreeMap<u32, Attribute>,
}

#[derive(Debug)]
struct ShaderState {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct ProgramState {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
    values: HashMap<i32, UniformVariable>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    next_id: u32,
    exhausted: bool,
    handle_budget: Option<usize>,
    fail_links: bool,
    compiles: usize,
    errors: VecDeque<u32>,

    buffers: HashMap<u32, (Vec<u8>, BufferHint)>,
    vertex_arrays: HashMap<u32, VertexArrayState>,
    shaders: HashMap<u32, ShaderState>,
    programs: HashMap<u32, ProgramState>,

    array_buffer: u32,
    // The element buffer of the default vertex array 0.
    element_buffer: u32,
    vertex_array: u32,
    program: u32,

    clear_color: Color,
    clears: usize,
    draws: Vec<DrawCall>,
}

impl HeadlessState {
    fn raise(&mut self, code: u32) {
        self.errors.push_back(code);
    }

    fn alloc(&mut self) -> u32 {
        if self.exhausted {
            self.raise(gl::OUT_OF_MEMORY);
            return 0;
        }

        match self.handle_budget {
            Some(0) => return 0,
            Some(ref mut budget) => *budget -= 1,
            None => {}
        }

        self.next_id += 1;
        self.next_id
    }

    fn element_buffer(&self) -> u32 {
        match self.vertex_arrays.get(&self.vertex_array) {
            Some(vao) => vao.element_buffer,
            None => self.element_buffer,
        }
    }

    fn set_element_buffer(&mut self, id: u32) {
        match self.vertex_arrays.get_mut(&self.vertex_array) {
            Some(vao) => vao.element_buffer = id,
            None => self.element_buffer = id,
        }
    }

    fn bound(&self, target: BufferTarget) -> u32 {
        match target {
            BufferTarget::Array => self.array_buffer,
            BufferTarget::Element => self.element_buffer(),
        }
    }
}

/// An in-memory driver. See the module documentation.
pub struct HeadlessVisitor {
    state: Rc<RefCell<HeadlessState>>,
}

impl Default for HeadlessVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessVisitor {
    pub fn new() -> Self {
        HeadlessVisitor {
            state: Rc::new(RefCell::new(HeadlessState::default())),
        }
    }

    /// Returns an inspector which shares the state of this visitor.
    pub fn stats(&self) -> HeadlessStats {
        HeadlessStats {
            state: self.state.clone(),
        }
    }
}

impl Visitor for HeadlessVisitor {
    unsafe fn version(&self) -> String {
        "3.3 (Core Profile) Headless".to_owned()
    }

    unsafe fn get_error(&mut self) -> u32 {
        self.state
            .borrow_mut()
            .errors
            .pop_front()
            .unwrap_or(gl::NO_ERROR)
    }

    unsafe fn create_buffer(&mut self) -> u32 {
        let mut state = self.state.borrow_mut();
        let id = state.alloc();
        if id != 0 {
            state.buffers.insert(id, (Vec::new(), BufferHint::default()));
        }

        id
    }

    unsafe fn bind_buffer(&mut self, target: BufferTarget, id: u32) {
        let mut state = self.state.borrow_mut();
        if id != 0 && !state.buffers.contains_key(&id) {
            state.raise(gl::INVALID_OPERATION);
            return;
        }

        match target {
            BufferTarget::Array => state.array_buffer = id,
            BufferTarget::Element => state.set_element_buffer(id),
        }
    }

    unsafe fn buffer_data(&mut self, target: BufferTarget, data: &[u8], hint: BufferHint) {
        let mut state = self.state.borrow_mut();
        let id = state.bound(target);
        match state.buffers.get_mut(&id) {
            Some(buf) => *buf = (data.to_vec(), hint),
            None => state.raise(gl::INVALID_OPERATION),
        }
    }

    unsafe fn delete_buffer(&mut self, id: u32) {
        let mut state = self.state.borrow_mut();
        if state.buffers.remove(&id).is_none() {
            return;
        }

        if state.array_buffer == id {
            state.array_buffer = 0;
        }

        if state.element_buffer() == id {
            state.set_element_buffer(0);
        }
    }

    unsafe fn create_vertex_array(&mut self) -> u32 {
        let mut state = self.state.borrow_mut();
        let id = state.alloc();
        if id != 0 {
            state.vertex_arrays.insert(id, VertexArrayState::default());
        }

        id
    }

    unsafe fn bind_vertex_array(&mut self, id: u32) {
        let mut state = self.state.borrow_mut();
        if id != 0 && !state.vertex_arrays.contains_key(&id) {
            state.raise(gl::INVALID_OPERATION);
            return;
        }

        state.vertex_array = id;
    }

    unsafe fn delete_vertex_array(&mut self, id: u32) {
        let mut state = self.state.borrow_mut();
        if state.vertex_arrays.remove(&id).is_some() && state.vertex_array == id {
            state.vertex_array = 0;
        }
    }

    unsafe fn enable_vertex_attrib(&mut self, index: u32) {
        let mut state = self.state.borrow_mut();
        if index >= MAX_VERTEX_ATTRIBUTES {
            state.raise(gl::INVALID_VALUE);
            return;
        }

        let current = state.vertex_array;
        match state.vertex_arrays.get_mut(&current) {
            Some(vao) => {
                vao.attributes
                    .entry(index)
                    .or_insert(Attribute {
                        enabled: false,
                        pointer: None,
                    })
                    .enabled = true;
            }
            None => state.raise(gl::INVALID_OPERATION),
        }
    }

    unsafe fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        element: VertexElement,
        stride: u32,
        offset: usize,
    ) {
        let mut state = self.state.borrow_mut();
        if index >= MAX_VERTEX_ATTRIBUTES || element.size < 1 || element.size > 4 {
            state.raise(gl::INVALID_VALUE);
            return;
        }

        let (current, buffer) = (state.vertex_array, state.array_buffer);
        if buffer == 0 {
            state.raise(gl::INVALID_OPERATION);
            return;
        }

        match state.vertex_arrays.get_mut(&current) {
            Some(vao) => {
                vao.attributes
                    .entry(index)
                    .or_insert(Attribute {
                        enabled: false,
                        pointer: None,
                    })
                    .pointer = Some((element, stride, offset, buffer));
            }
            None => state.raise(gl::INVALID_OPERATION),
        }
    }

    unsafe fn create_shader(&mut self, stage: ShaderStage) -> u32 {
        let mut state = self.state.borrow_mut();
        let id = state.alloc();
        if id != 0 {
            let shader = ShaderState {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
            };

            state.shaders.insert(id, shader);
        }

        id
    }

    unsafe fn shader_source(&mut self, id: u32, source: &str) {
        let mut state = self.state.borrow_mut();
        match state.shaders.get_mut(&id) {
            Some(shader) => shader.source = source.to_owned(),
            None => state.raise(gl::INVALID_VALUE),
        }
    }

    unsafe fn compile_shader(&mut self, id: u32) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        match state.shaders.get_mut(&id) {
            Some(shader) => {
                state.compiles += 1;
                match lint(&shader.source) {
                    Ok(()) => {
                        shader.compiled = true;
                        shader.log.clear();
                    }
                    Err(log) => {
                        shader.compiled = false;
                        shader.log = log;
                    }
                }
            }
            None => state.raise(gl::INVALID_VALUE),
        }
    }

    unsafe fn compile_status(&mut self, id: u32) -> bool {
        let mut state = self.state.borrow_mut();
        match state.shaders.get(&id) {
            Some(shader) => shader.compiled,
            None => {
                state.raise(gl::INVALID_VALUE);
                false
            }
        }
    }

    unsafe fn shader_info_log(&mut self, id: u32) -> String {
        let mut state = self.state.borrow_mut();
        match state.shaders.get(&id) {
            Some(shader) => shader.log.clone(),
            None => {
                state.raise(gl::INVALID_VALUE);
                String::new()
            }
        }
    }

    unsafe fn delete_shader(&mut self, id: u32) {
        let mut state = self.state.borrow_mut();
        if id != 0 && state.shaders.remove(&id).is_none() {
            state.raise(gl::INVALID_VALUE);
        }
    }

    unsafe fn create_program(&mut self) -> u32 {
        let mut state = self.state.borrow_mut();
        let id = state.alloc();
        if id != 0 {
            state.programs.insert(id, ProgramState::default());
        }

        id
    }

    unsafe fn attach_shader(&mut self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        let attached = match state.programs.get(&program) {
            Some(p) if state.shaders.contains_key(&shader) => p.attached.contains(&shader),
            _ => {
                state.raise(gl::INVALID_VALUE);
                return;
            }
        };

        if attached {
            state.raise(gl::INVALID_OPERATION);
        } else if let Some(p) = state.programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    unsafe fn detach_shader(&mut self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        let index = match state.programs.get(&program) {
            Some(p) => p.attached.iter().position(|&v| v == shader),
            None => {
                state.raise(gl::INVALID_VALUE);
                return;
            }
        };

        match (index, state.programs.get_mut(&program)) {
            (Some(index), Some(p)) => {
                p.attached.remove(index);
            }
            _ => state.raise(gl::INVALID_OPERATION),
        }
    }

    unsafe fn link_program(&mut self, id: u32) {
        let mut state = self.state.borrow_mut();
        let refused = state.fail_links;
        let result = match state.programs.get(&id) {
            Some(_) if refused => Err("error: the linker refused the program.".to_owned()),
            Some(p) => link(&state.shaders, &p.attached),
            None => {
                state.raise(gl::INVALID_VALUE);
                return;
            }
        };

        if let Some(p) = state.programs.get_mut(&id) {
            p.values.clear();
            match result {
                Ok(uniforms) => {
                    p.linked = true;
                    p.uniforms = uniforms;
                    p.log.clear();
                }
                Err(log) => {
                    p.linked = false;
                    p.uniforms.clear();
                    p.log = log;
                }
            }
        }
    }

    unsafe fn link_status(&mut self, id: u32) -> bool {
        let mut state = self.state.borrow_mut();
        match state.programs.get(&id) {
            Some(p) => p.linked,
            None => {
                state.raise(gl::INVALID_VALUE);
                false
            }
        }
    }

    unsafe fn program_info_log(&mut self, id: u32) -> String {
        let mut state = self.state.borrow_mut();
        match state.programs.get(&id) {
            Some(p) => p.log.clone(),
            None => {
                state.raise(gl::INVALID_VALUE);
                String::new()
            }
        }
    }

    unsafe fn validate_program(&mut self, id: u32) {
        let mut state = self.state.borrow_mut();
        if !state.programs.contains_key(&id) {
            state.raise(gl::INVALID_VALUE);
        }
    }

    unsafe fn use_program(&mut self, id: u32) {
        let mut state = self.state.borrow_mut();
        if id == 0 {
            state.program = 0;
            return;
        }

        match state.programs.get(&id).map(|p| p.linked) {
            Some(true) => state.program = id,
            Some(false) => state.raise(gl::INVALID_OPERATION),
            None => state.raise(gl::INVALID_VALUE),
        }
    }

    unsafe fn delete_program(&mut self, id: u32) {
        let mut state = self.state.borrow_mut();
        if id == 0 {
            return;
        }

        if state.programs.remove(&id).is_none() {
            state.raise(gl::INVALID_VALUE);
        } else if state.program == id {
            state.program = 0;
        }
    }

    unsafe fn uniform_location(&mut self, program: u32, name: &str) -> i32 {
        let mut state = self.state.borrow_mut();
        let location = match state.programs.get(&program) {
            Some(p) if p.linked => p.uniforms.iter().position(|v| v == name),
            Some(_) => {
                state.raise(gl::INVALID_OPERATION);
                return -1;
            }
            None => {
                state.raise(gl::INVALID_VALUE);
                return -1;
            }
        };

        location.map(|v| v as i32).unwrap_or(-1)
    }

    unsafe fn uniform(&mut self, location: i32, variable: UniformVariable) {
        let mut state = self.state.borrow_mut();
        let current = state.program;
        let valid = match state.programs.get_mut(&current) {
            Some(_) if location == -1 => true,
            Some(p) if location >= 0 && (location as usize) < p.uniforms.len() => {
                p.values.insert(location, variable);
                true
            }
            _ => false,
        };

        if !valid {
            state.raise(gl::INVALID_OPERATION);
        }
    }

    unsafe fn clear_color(&mut self, color: Color) {
        self.state.borrow_mut().clear_color = color;
    }

    unsafe fn clear(&mut self) {
        self.state.borrow_mut().clears += 1;
    }

    unsafe fn draw_elements(&mut self, count: u32) {
        let mut state = self.state.borrow_mut();
        let element_buffer = state.element_buffer();
        let len = state.buffers.get(&element_buffer).map(|v| v.0.len());

        let valid = state.vertex_array != 0
            && state.program != 0
            && len.map(|v| v >= count as usize * 4).unwrap_or(false);

        if !valid {
            state.raise(gl::INVALID_OPERATION);
            return;
        }

        let draw = DrawCall {
            program: state.program,
            vertex_array: state.vertex_array,
            element_buffer,
            count,
        };

        state.draws.push(draw);
    }
}

/// An inspector of the state of a `HeadlessVisitor`, with means to inject faults.
#[derive(Clone)]
pub struct HeadlessStats {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessStats {
    /// Queues an error code, as if the driver raised it.
    pub fn inject_error(&self, code: u32) {
        self.state.borrow_mut().raise(code);
    }

    /// Makes every following allocation fail with handle 0 and `OUT_OF_MEMORY`.
    pub fn exhaust_handles(&self, exhausted: bool) {
        self.state.borrow_mut().exhausted = exhausted;
    }

    /// Lets only the next `budget` allocations succeed. Later ones return handle 0
    /// without raising an error. `None` lifts the limit.
    pub fn limit_handles(&self, budget: Option<usize>) {
        self.state.borrow_mut().handle_budget = budget;
    }

    /// Makes every following link fail, with a log but no error code.
    pub fn fail_links(&self, fail: bool) {
        self.state.borrow_mut().fail_links = fail;
    }

    /// Returns the number of compilations of existing shader objects.
    pub fn compiled_shaders(&self) -> usize {
        self.state.borrow().compiles
    }

    /// Returns the number of queued error codes.
    pub fn pending_errors(&self) -> usize {
        self.state.borrow().errors.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    /// Returns the number of live objects of every kind.
    pub fn live_objects(&self) -> usize {
        self.live_buffers() + self.live_vertex_arrays() + self.live_shaders() + self.live_programs()
    }

    /// Returns the contents of buffer `id`.
    pub fn buffer(&self, id: u32) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&id).map(|v| v.0.clone())
    }

    /// Returns the stage of the shader object `id`.
    pub fn shader_stage(&self, id: u32) -> Option<ShaderStage> {
        self.state.borrow().shaders.get(&id).map(|v| v.stage)
    }

    /// Returns attribute `index` of vertex array `id`.
    pub fn attribute(&self, id: u32, index: u32) -> Option<Attribute> {
        let state = self.state.borrow();
        let vao = state.vertex_arrays.get(&id)?;
        vao.attributes.get(&index).cloned()
    }

    /// Returns the last value uploaded into uniform `name` of `program`.
    pub fn uniform(&self, program: u32, name: &str) -> Option<UniformVariable> {
        let state = self.state.borrow();
        let p = state.programs.get(&program)?;
        let location = p.uniforms.iter().position(|v| v == name)?;
        p.values.get(&(location as i32)).cloned()
    }

    /// Returns what is bound in the simulated driver.
    pub fn bindings(&self) -> Bindings {
        let state = self.state.borrow();
        let some = |v: u32| if v == 0 { None } else { Some(v) };
        Bindings {
            vertex_array: some(state.vertex_array),
            array_buffer: some(state.array_buffer),
            element_buffer: some(state.element_buffer()),
            program: some(state.program),
        }
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.state.borrow().draws.clone()
    }

    pub fn clears(&self) -> usize {
        self.state.borrow().clears
    }

    pub fn clear_color(&self) -> Color {
        self.state.borrow().clear_color
    }
}

/// Checks the source like a compiler front-end would, producing a driver styled
/// log on failure.
fn lint(source: &str) -> ::std::result::Result<(), String> {
    let mut braces = 0i32;
    let mut parens = 0i32;
    let mut last = 0;

    for (no, line) in source.lines().enumerate() {
        let line = line.split("//").next().unwrap_or("");
        last = no + 1;

        for c in line.chars() {
            match c {
                '{' => braces += 1,
                '}' => braces -= 1,
                '(' => parens += 1,
                ')' => parens -= 1,
                _ => {}
            }

            if braces < 0 {
                return Err(format!("0:{}: error: syntax error, unexpected '}}'", no + 1));
            }

            if parens < 0 {
                return Err(format!("0:{}: error: syntax error, unexpected ')'", no + 1));
            }
        }
    }

    if braces != 0 || parens != 0 {
        return Err(format!("0:{}: error: syntax error, unexpected end of file", last));
    }

    if !source.contains("main") {
        return Err("0:0: error: no function with name 'main'".to_owned());
    }

    Ok(())
}

/// Links the attached shaders, returning the uniforms of the program.
fn link(
    shaders: &HashMap<u32, ShaderState>,
    attached: &[u32],
) -> ::std::result::Result<Vec<String>, String> {
    let mut uniforms = Vec::new();

    for &stage in &[ShaderStage::Vertex, ShaderStage::Fragment] {
        let mut iter = attached
            .iter()
            .filter_map(|id| shaders.get(id))
            .filter(|v| v.stage == stage);

        let shader = match (iter.next(), iter.next()) {
            (Some(v), None) => v,
            (None, _) => return Err(format!("error: no {} shader attached.", stage)),
            (Some(_), Some(_)) => {
                return Err(format!("error: multiple {} shaders attached.", stage));
            }
        };

        if !shader.compiled {
            return Err(format!("error: {} shader is not compiled.", stage));
        }

        for name in declared_uniforms(&shader.source) {
            if !uniforms.contains(&name) {
                uniforms.push(name);
            }
        }
    }

    Ok(uniforms)
}

/// Returns the names of `uniform` declarations in `source`.
fn declared_uniforms(source: &str) -> Vec<String> {
    let mut names = Vec::new();

    for line in source.lines() {
        let line = line.split("//").next().unwrap_or("");
        let mut tokens = line
            .split(|c: char| c.is_whitespace() || c == ';')
            .filter(|v| !v.is_empty())
            .skip_while(|&v| v != "uniform")
            .skip(1)
            .skip_while(|&v| v == "lowp" || v == "mediump" || v == "highp");

        if let (Some(_), Some(name)) = (tokens.next(), tokens.next()) {
            let name = name.split('[').next().unwrap_or(name);
            names.push(name.to_owned());
        }
    }

    names
}
