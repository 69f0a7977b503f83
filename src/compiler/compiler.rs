//! Main compiler module.
//!
//! Owns the LLVM context handles and lowers a checked [`File`] into a module.
//! Every function is declared before any body is generated, so calls resolve
//! regardless of where the callee appears in the source.

use std::{collections::HashMap, fmt::Display, path::Path};

use inkwell::{
    builder::Builder,
    context::Context,
    module::{Linkage, Module},
    targets::{CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine},
    types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType},
    values::{FunctionValue, PointerValue},
    AddressSpace, OptimizationLevel,
};
use log::{debug, info};

use crate::{
    ast::{
        ast::{File, Function, FunctionState},
        types::{Primitive, Type},
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::stmt::gen_function_body;

/// The code generation state for one source file.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the LLVM context
pub struct Compiler<'a> {
    /// Map of the current function's parameters and locals to their stack slots
    pub named_allocas: HashMap<String, PointerValue<'a>>,

    /// Reference to the LLVM context
    pub context: &'a Context,
    /// The LLVM module being built
    pub module: Module<'a>,
    /// The LLVM IR builder
    pub builder: Builder<'a>,
}

/// Wraps a failure reported by LLVM.
pub fn backend_error<E: Display>(error: E) -> Error {
    Error::new(
        ErrorImpl::Backend {
            message: error.to_string(),
        },
        Position::null(),
    )
}

impl<'a> Compiler<'a> {
    pub fn new(context: &'a Context, module_name: &str) -> Self {
        Compiler {
            named_allocas: HashMap::new(),
            module: context.create_module(module_name),
            builder: context.create_builder(),
            context,
        }
    }

    /// Converts a value type to its LLVM representation.
    ///
    /// `void` has no value representation; behind a pointer it becomes `i8`,
    /// so `void*` lowers to `i8*`.
    pub fn convert_type(&self, ty: &Type) -> Result<BasicTypeEnum<'a>, Error> {
        match ty {
            Type::Primitive(primitive) => match primitive {
                Primitive::I8 => Ok(self.context.i8_type().into()),
                Primitive::I16 => Ok(self.context.i16_type().into()),
                Primitive::I32 => Ok(self.context.i32_type().into()),
                Primitive::I64 => Ok(self.context.i64_type().into()),
                Primitive::Void | Primitive::F16 | Primitive::F32 | Primitive::F64 => {
                    Err(unsupported_type(ty))
                }
            },
            Type::Pointer(inner) => {
                let pointee = match inner.as_ref() {
                    Type::Primitive(Primitive::Void) => self.context.i8_type().into(),
                    other => self.convert_type(other)?,
                };

                Ok(pointee.ptr_type(AddressSpace::default()).into())
            }
            Type::Variadic => Err(unsupported_type(ty)),
        }
    }

    /// Builds the LLVM signature of `function`, variadic marker included.
    pub fn function_type(&self, function: &Function) -> Result<FunctionType<'a>, Error> {
        let params = function
            .fixed_params()
            .iter()
            .map(|param| self.convert_type(&param.ty).map(BasicMetadataTypeEnum::from))
            .collect::<Result<Vec<_>, Error>>()?;

        if function.return_type.is_void() {
            return Ok(self.context.void_type().fn_type(&params, function.is_variadic()));
        }

        Ok(self
            .convert_type(&function.return_type)?
            .fn_type(&params, function.is_variadic()))
    }

    /// Adds the prototype of `function` to the module.
    pub fn declare_function(&self, function: &Function) -> Result<FunctionValue<'a>, Error> {
        let function_type = self.function_type(function)?;

        Ok(self
            .module
            .add_function(&function.name, function_type, Some(Linkage::External)))
    }

    /// Runs the LLVM verifier over the whole module.
    pub fn verify(&self) -> Result<(), Error> {
        self.module.verify().map_err(backend_error)
    }

    /// The textual IR of the module.
    pub fn ir(&self) -> String {
        self.module.print_to_string().to_string()
    }

    fn native_target_machine(&self) -> Result<TargetMachine, Error> {
        Target::initialize_native(&InitializationConfig::default()).map_err(backend_error)?;

        let target_triple = TargetMachine::get_default_triple();
        let target = Target::from_triple(&target_triple).map_err(backend_error)?;

        target
            .create_target_machine(
                &target_triple,
                &TargetMachine::get_host_cpu_name().to_string(),
                &TargetMachine::get_host_cpu_features().to_string(),
                OptimizationLevel::Default,
                RelocMode::PIC,
                CodeModel::Default,
            )
            .ok_or_else(|| backend_error("Failed to create target machine"))
    }

    /// Writes `<stem>.s` and `<stem>.o` into `directory` for the host target.
    pub fn emit(&self, directory: &Path, stem: &str) -> Result<(), Error> {
        let target_machine = self.native_target_machine()?;

        self.module.set_triple(&target_machine.get_triple());
        self.module
            .set_data_layout(&target_machine.get_target_data().get_data_layout());

        for (file_type, extension) in [(FileType::Assembly, "s"), (FileType::Object, "o")] {
            let path = directory.join(format!("{}.{}", stem, extension));

            target_machine
                .write_to_file(&self.module, file_type, &path)
                .map_err(backend_error)?;
            info!("Wrote {}", path.display());
        }

        Ok(())
    }
}

pub fn unsupported_type(ty: &Type) -> Error {
    Error::new(
        ErrorImpl::UnsupportedType {
            type_: ty.to_string(),
        },
        Position::null(),
    )
}

/// Lowers every function of a checked `file` into a fresh module named
/// `module_name`.
///
/// Foreign functions are declared first, then all user prototypes, then the
/// user bodies in declaration order. Each function moves to
/// [`FunctionState::Generated`].
pub fn compile<'a>(
    file: &mut File,
    module_name: &str,
    context: &'a Context,
) -> Result<Compiler<'a>, Error> {
    let mut compiler = Compiler::new(context, module_name);

    for function in file.functions.iter_mut() {
        function.advance(FunctionState::Checked, FunctionState::Generated)?;
    }

    for function in file.foreign_functions() {
        compiler.declare_function(function)?;
        debug!("Declared foreign function `{}`", function.name);
    }

    let prototypes = file
        .user_functions()
        .map(|function| compiler.declare_function(function))
        .collect::<Result<Vec<_>, Error>>()?;

    for (function, value) in file.user_functions().zip(prototypes) {
        gen_function_body(&mut compiler, function, value)?;
    }

    compiler.verify()?;
    Ok(compiler)
}
